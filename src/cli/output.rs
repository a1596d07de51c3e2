pub use apidup_core::format::OutputFormat;
use clap::builder::{PossibleValuesParser, TypedValueParser};

/// `--format` parser; clap lists the accepted values in help and errors
pub fn format_parser() -> impl TypedValueParser<Value = OutputFormat> {
    PossibleValuesParser::new(["human", "json"])
        .map(|value| value.parse::<OutputFormat>().unwrap_or_default())
}
