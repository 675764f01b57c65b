use clap::Parser;

use crate::utils::version;

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli() {
        Cli::command().debug_assert();
        assert!(Cli::try_parse_from(["flappy-rs"]).is_ok());
        assert!(Cli::try_parse_from(["flappy-rs", "--speed", "3"]).is_err());
    }
}
