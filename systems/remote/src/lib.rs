#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Remote command parser translating text commands into button presses.

use noise_identification_core::{ButtonId, Category, Command};
use thiserror::Error;

/// Usage hint shown to remote players.
pub const HELP_MESSAGE: &str = "Press a button with \"crystal\" or \"c\". Valid commands are \
\"crystal\", \"liquid\", \"moisture\", \"perlin\", \"voronoi\", \"white\", as well as their initials.";

/// Error returned when a remote command does not name a button.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unrecognized command '{command}'")]
pub struct UnrecognizedCommand {
    /// Normalised command text that failed to parse.
    pub command: String,
}

/// Parses a remote command into the category of the button it presses.
///
/// Matching ignores case and surrounding whitespace, and accepts either the
/// full category name or its initial.
pub fn parse(command: &str) -> Result<Category, UnrecognizedCommand> {
    let normalised = command.trim().to_lowercase();
    let category = match normalised.as_str() {
        "c" | "crystal" => Category::Crystal,
        "l" | "liquid" => Category::Liquid,
        "m" | "moisture" => Category::Moisture,
        "p" | "perlin" => Category::Perlin,
        "v" | "voronoi" => Category::Voronoi,
        "w" | "white" => Category::White,
        _ => {
            return Err(UnrecognizedCommand {
                command: normalised,
            })
        }
    };
    Ok(category)
}

/// Parses a remote command into the press it injects into the module.
pub fn to_command(command: &str) -> Result<Command, UnrecognizedCommand> {
    let category = parse(command)?;
    Ok(Command::PressButton {
        button: ButtonId::for_category(category),
    })
}

#[cfg(test)]
mod tests {
    use super::{parse, to_command, UnrecognizedCommand};
    use noise_identification_core::{ButtonId, Category, Command};

    #[test]
    fn initials_and_names_resolve_regardless_of_case() {
        assert_eq!(parse("C"), Ok(Category::Crystal));
        assert_eq!(parse(" crystal "), Ok(Category::Crystal));
        assert_eq!(parse("Crystal"), Ok(Category::Crystal));
        assert_eq!(parse("LIQUID"), Ok(Category::Liquid));
        assert_eq!(parse("\tm\n"), Ok(Category::Moisture));
        assert_eq!(parse("p"), Ok(Category::Perlin));
        assert_eq!(parse("Voronoi"), Ok(Category::Voronoi));
        assert_eq!(parse("w"), Ok(Category::White));
    }

    #[test]
    fn every_category_name_parses_back() {
        for category in Category::ALL {
            assert_eq!(parse(category.name()), Ok(category));
        }
    }

    #[test]
    fn unknown_commands_are_rejected() {
        assert_eq!(
            parse("x"),
            Err(UnrecognizedCommand {
                command: "x".to_owned(),
            })
        );
        assert!(parse("").is_err());
        assert!(parse("press c").is_err());
        assert!(parse("crystals").is_err());
    }

    #[test]
    fn rejection_reports_the_normalised_command() {
        let error = parse("  Noise ").expect_err("not a button");
        assert_eq!(error.to_string(), "unrecognized command 'noise'");
    }

    #[test]
    fn commands_press_the_matching_button() {
        assert_eq!(
            to_command("v"),
            Ok(Command::PressButton {
                button: ButtonId::for_category(Category::Voronoi),
            })
        );
    }
}
