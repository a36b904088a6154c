//! Bit-granular bitstring construction and pattern matching, modeled after
//! Erlang/Elixir binary syntax (`<<...>>`).
//!
//! The crate has two halves built on a shared [`BitString`] representation:
//!
//! - [`builder`] appends typed segments (integers, floats, binary, bitstring,
//!   UTF code points) to a growing bitstring, resolving variables through an
//!   [`Environment`].
//! - [`matcher`] walks a pattern of segments against a bitstring, extracting
//!   [`Bindings`], enforcing literal equality, and resolving dynamic segment
//!   sizes through an embedded arithmetic evaluator.
//!
//! Both halves share the same segment vocabulary ([`Segment`],
//! [`SegmentValue`], [`SizeSpec`], specifier tokens resolved by
//! [`Specifiers`]) and the same [`Value`] sum type for host-crossing data.
#![deny(
    unstable_features,
    unused_import_braces,
    unused_qualifications,
)]
#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod bitstring;
pub mod builder;
pub mod env;
pub mod error;
pub mod eval;
pub mod intbits;
pub mod limits;
pub mod matcher;
pub mod segment;
pub mod specifier;
pub mod utf;
pub mod value;

pub use bitstring::BitString;
pub use builder::{build, build_with_limits};
pub use env::{EmptyEnvironment, Environment, MapEnvironment};
pub use error::{BuildError, BuildResult, EvalError, MatchError, MatchResult, SpecifierError};
pub use eval::{parse_expr, Expr};
pub use limits::{Limits, DEFAULT_MAX_BITS};
pub use matcher::{match_bitstring, match_with_limits, Bindings, MatchMode};
pub use segment::{Literal, Segment, SegmentValue, SizeSpec};
pub use specifier::{Endianness, ResolvedEndianness, SegmentType, Specifiers};
pub use value::Value;
