mod cli_command_parse_tests;
mod config_tests;
mod search_tests;
