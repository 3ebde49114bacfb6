pub mod chronological;
pub mod raw_parser;
