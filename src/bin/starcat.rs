use anyhow::anyhow;
use clap::{ArgMatches, Command};
use star_catalog_engine::{render::LinearTone, Engine, RenderConfig};

mod cmdline {
    use clap::{parser::ValuesRef, value_parser, Arg, ArgAction, ArgMatches, Command};
    use std::path::PathBuf;

    //fp add_catalog_arg
    pub fn add_catalog_arg(cmd: Command) -> Command {
        cmd.arg(
            Arg::new("catalog")
                .required(true)
                .help("Catalogue files to load (one per level)")
                .action(ArgAction::Append),
        )
    }
    pub fn catalog(matches: &ArgMatches) -> Vec<PathBuf> {
        matches
            .get_many::<String>("catalog")
            .into_iter()
            .flatten()
            .map(PathBuf::from)
            .collect()
    }

    //fp add_hip_arg
    pub fn add_hip_arg(cmd: Command) -> Command {
        cmd.arg(
            Arg::new("hip")
                .long("hip")
                .help("Hipparcos number to look up")
                .value_parser(value_parser!(u32))
                .action(ArgAction::Set),
        )
    }
    pub fn hip(matches: &ArgMatches) -> Option<u32> {
        matches.get_one::<u32>("hip").copied()
    }

    //fp add_name_arg
    pub fn add_name_arg(cmd: Command) -> Command {
        cmd.arg(
            Arg::new("name")
                .help("Star name to look up (common name, 'HP <n>', or 'hp_<n>')")
                .action(ArgAction::Set),
        )
    }
    pub fn name(matches: &ArgMatches) -> Option<String> {
        matches.get_one::<String>("name").map(|s| s.to_string())
    }

    //fp add_right_ascension_arg
    pub fn add_right_ascension_arg(cmd: Command) -> Command {
        cmd.arg(
            Arg::new("right_ascension")
                .long("ra")
                .help("Right ascension, degrees")
                .value_parser(value_parser!(f64))
                .action(ArgAction::Set),
        )
    }
    pub fn right_ascension(matches: &ArgMatches) -> f64 {
        matches.get_one::<f64>("right_ascension").copied().unwrap_or(0.0)
    }

    //fp add_declination_arg
    pub fn add_declination_arg(cmd: Command) -> Command {
        cmd.arg(
            Arg::new("declination")
                .long("dec")
                .help("Declination, degrees")
                .value_parser(value_parser!(f64))
                .action(ArgAction::Set),
        )
    }
    pub fn declination(matches: &ArgMatches) -> f64 {
        matches.get_one::<f64>("declination").copied().unwrap_or(0.0)
    }

    //fp add_angle_arg
    pub fn add_angle_arg(cmd: Command) -> Command {
        cmd.arg(
            Arg::new("angle")
                .long("angle")
                .help("Cone search radius, degrees")
                .value_parser(value_parser!(f32))
                .action(ArgAction::Set),
        )
    }
    pub fn angle(matches: &ArgMatches) -> f32 {
        matches.get_one::<f32>("angle").copied().unwrap_or(1.0)
    }

    //fp add_jd_arg
    pub fn add_jd_arg(cmd: Command) -> Command {
        cmd.arg(
            Arg::new("jd")
                .long("jd")
                .help("Julian date to evaluate proper motion at (default: J2000)")
                .value_parser(value_parser!(f64))
                .action(ArgAction::Set),
        )
    }
    pub fn jd(matches: &ArgMatches) -> Option<f64> {
        matches.get_one::<f64>("jd").copied()
    }

    //fp add_prefix_arg
    pub fn add_prefix_arg(cmd: Command) -> Command {
        cmd.arg(
            Arg::new("prefix")
                .required(true)
                .help("Name prefix to match")
                .action(ArgAction::Set),
        )
    }
    pub fn prefix(matches: &ArgMatches) -> String {
        matches.get_one::<String>("prefix").unwrap().to_string()
    }

    //fp add_max_items_arg
    pub fn add_max_items_arg(cmd: Command) -> Command {
        cmd.arg(
            Arg::new("max_items")
                .long("max")
                .help("Maximum number of matches to list")
                .value_parser(value_parser!(usize))
                .action(ArgAction::Set),
        )
    }
    pub fn max_items(matches: &ArgMatches) -> usize {
        matches.get_one::<usize>("max_items").copied().unwrap_or(10)
    }

    pub fn _unused(_v: Option<ValuesRef<'_, String>>) {}
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let cmd = Command::new("starcat")
        .about("Hierarchical star catalogue engine CLI")
        .version("0.1.0");
    let cmd = cmdline::add_catalog_arg(cmd);
    let cmd = cmdline::add_jd_arg(cmd);

    let find_subcmd = Command::new("find").about("Look up a star by Hipparcos number or name");
    let find_subcmd = cmdline::add_hip_arg(find_subcmd);
    let find_subcmd = cmdline::add_name_arg(find_subcmd);

    let around_subcmd = Command::new("around").about("Cone search around a sky direction");
    let around_subcmd = cmdline::add_right_ascension_arg(around_subcmd);
    let around_subcmd = cmdline::add_declination_arg(around_subcmd);
    let around_subcmd = cmdline::add_angle_arg(around_subcmd);

    let list_matching_subcmd = Command::new("list-matching").about("List names by prefix");
    let list_matching_subcmd = cmdline::add_prefix_arg(list_matching_subcmd);
    let list_matching_subcmd = cmdline::add_max_items_arg(list_matching_subcmd);

    let cmd = cmd
        .subcommand(find_subcmd)
        .subcommand(around_subcmd)
        .subcommand(list_matching_subcmd);

    let matches = cmd.get_matches();

    let catalog_paths = cmdline::catalog(&matches);
    let jd = cmdline::jd(&matches).unwrap_or(star_catalog_engine::motion::J2000);

    let mut engine = Engine::new();
    engine.catalogue.load(&catalog_paths, &|path| {
        println!("loading {path}");
    })?;

    match matches.subcommand() {
        Some(("find", sub)) => find(&engine, sub, jd),
        Some(("around", sub)) => around(&engine, sub, jd),
        Some(("list-matching", sub)) => list_matching(&engine, sub),
        _ => {
            println!(
                "Catalogue has {} level(s)",
                engine.catalogue.levels().count()
            );
            Ok(())
        }
    }
}

fn display_star(engine: &Engine, handle: star_catalog_engine::StarHandle, jd: f64) {
    let pos = engine.catalogue.position_of(handle, jd);
    let mag = engine.catalogue.magnitude_of(handle).unwrap_or(f32::NAN);
    let name = engine.name_of(handle).unwrap_or("");
    println!(
        "level {} zone {} star {} : pos {:?} : mag {mag:.2} : {name}",
        handle.level, handle.zone, handle.star, pos
    );
}

fn find(engine: &Engine, matches: &ArgMatches, jd: f64) -> Result<(), anyhow::Error> {
    if let Some(hip) = cmdline::hip(matches) {
        match engine.search_hip(hip) {
            Some(handle) => display_star(engine, handle, jd),
            None => eprintln!("no star with Hipparcos number {hip}"),
        }
        return Ok(());
    }
    if let Some(name) = cmdline::name(matches) {
        match engine.search_by_name(&name) {
            Some(handle) => display_star(engine, handle, jd),
            None => eprintln!("no star matching name {name:?}"),
        }
        return Ok(());
    }
    Err(anyhow!("find requires --hip <n> or a name argument"))
}

fn around(engine: &Engine, matches: &ArgMatches, jd: f64) -> Result<(), anyhow::Error> {
    let ra = cmdline::right_ascension(matches).to_radians();
    let dec = cmdline::declination(matches).to_radians();
    let angle = cmdline::angle(matches);
    let v: star_catalog_engine::Vec3 = [
        (dec.cos() * ra.cos()) as f32,
        (dec.cos() * ra.sin()) as f32,
        dec.sin() as f32,
    ]
    .into();
    for handle in engine.search_around(v, angle, jd) {
        display_star(engine, handle, jd);
    }
    Ok(())
}

fn list_matching(engine: &Engine, matches: &ArgMatches) -> Result<(), anyhow::Error> {
    let prefix = cmdline::prefix(matches);
    let max_items = cmdline::max_items(matches);
    for name in engine.list_matching(&prefix, max_items, false, true) {
        println!("{name}");
    }
    Ok(())
}

// Keeps the render planner / tone reproducer reachable from the CLI
// surface even though no subcommand exercises drawing yet.
#[allow(dead_code)]
fn plan_frame(engine: &Engine, fov_degrees: f32) -> usize {
    engine.build_level_plans(fov_degrees, &LinearTone).len()
}

#[allow(dead_code)]
fn default_render_config() -> RenderConfig {
    RenderConfig::default()
}
