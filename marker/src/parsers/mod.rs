pub mod verdict_parser;
