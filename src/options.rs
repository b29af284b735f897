use std::{path::PathBuf, str::FromStr};

use maxrects::PackingLogic;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(about = "Packs sprites into texture atlases")]
pub struct Options {
    #[structopt(flatten)]
    pub global: GlobalOptions,

    #[structopt(subcommand)]
    pub command: Subcommand,
}

#[derive(Debug, StructOpt)]
pub struct GlobalOptions {
    /// Sets verbosity level. Can be specified multiple times. RUST_LOG takes
    /// precedence when it's set.
    #[structopt(long("verbose"), short, parse(from_occurrences))]
    pub verbosity: u8,
}

#[derive(Debug, StructOpt)]
pub enum Subcommand {
    /// Pack the sprites described by an atlas.toml file into atlas pages, and
    /// write a JSON manifest describing where each sprite went.
    Pack(PackOptions),
}

#[derive(Debug, StructOpt)]
pub struct PackOptions {
    /// The path to an atlas.toml file, or a folder containing one. Defaults
    /// to the current working directory.
    pub project_path: Option<PathBuf>,

    /// The folder to write atlas pages and the manifest into. Defaults to the
    /// folder containing the atlas config.
    #[structopt(long)]
    pub output: Option<PathBuf>,

    /// Only write the manifest. Input images are measured, but not decoded,
    /// and no atlas pages are written.
    #[structopt(long)]
    pub manifest_only: bool,

    /// Overrides the packing heuristic from the config.
    ///
    /// Options: max-edge, max-area, best-short-side
    #[structopt(long)]
    pub logic: Option<LogicOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicOption(pub PackingLogic);

impl FromStr for LogicOption {
    type Err = String;

    fn from_str(value: &str) -> Result<LogicOption, Self::Err> {
        match value {
            "max-edge" => Ok(LogicOption(PackingLogic::MaxEdge)),
            "max-area" => Ok(LogicOption(PackingLogic::MaxArea)),
            "best-short-side" => Ok(LogicOption(PackingLogic::BestShortSide)),

            _ => Err(String::from(
                "Invalid packing logic. Valid options are 'max-edge', 'max-area', and 'best-short-side'.",
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_pack_command() {
        let options = Options::from_iter(&[
            "atlaspack",
            "-vv",
            "pack",
            "assets/ui",
            "--output",
            "build",
            "--logic",
            "best-short-side",
        ]);

        assert_eq!(options.global.verbosity, 2);

        let Subcommand::Pack(pack) = options.command;
        assert_eq!(pack.project_path, Some(PathBuf::from("assets/ui")));
        assert_eq!(pack.output, Some(PathBuf::from("build")));
        assert!(!pack.manifest_only);
        assert_eq!(pack.logic, Some(LogicOption(PackingLogic::BestShortSide)));
    }

    #[test]
    fn unknown_logic_is_rejected() {
        assert!("guillotine".parse::<LogicOption>().is_err());
    }
}
