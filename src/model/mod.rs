// File: ./src/model/mod.rs
pub mod bang;
pub mod dates;
pub mod draft;
pub mod parser;
pub mod prefixes;
pub mod token;

pub use bang::{BangOutcome, apply_bang_today};
pub use dates::{DateCandidate, DateResolver, NaturalDateResolver, extract_date};
pub use draft::{TaskDraft, build_draft, build_draft_at};
pub use parser::{ConsumedRegions, ParserConfig, parse, parse_at, parse_with, quote_reference};
pub use prefixes::{RefKind, SyntaxMode, SyntaxPrefixes, get_prefixes};
pub use token::{DateValue, ParseResult, ParsedToken, TokenType, TokenValue};
