//! Layout engine for annotation tags.
//!
//! Aligns, distributes and declutters tags that point at geometry through
//! bent leader lines. The document model stays on the other side of the
//! [`Host`] trait; [`host::memory::MemoryHost`] is a self-contained
//! implementation for tests and experiments.
//!
//! ```
//! use glam::dvec2;
//! use tagalign::host::memory::{MemoryAnnotation, MemoryHost};
//! use tagalign::layout::FreeNote;
//! use tagalign::{AlignKind, Command, LayoutSettings, Outcome};
//!
//! let mut host = MemoryHost::new();
//! let a = host.add_annotation(MemoryAnnotation::new(FreeNote, dvec2(0.0, 5.0), dvec2(2.0, 1.0)));
//! let b = host.add_annotation(MemoryAnnotation::new(FreeNote, dvec2(4.0, 1.0), dvec2(2.0, 1.0)));
//! host.select(&[a, b]);
//!
//! let outcome = Command::Align(AlignKind::Top).execute(&mut host, &LayoutSettings::default());
//! assert_eq!(outcome, Outcome::Succeeded);
//! assert_eq!(host.annotation(b).unwrap().head, dvec2(4.0, 5.0));
//! ```

pub mod commands;
pub mod errors;
pub mod host;
pub mod layout;
pub mod log;
pub mod settings;
pub mod types;

pub use commands::{AutoTagReport, Command, Outcome, auto_tag};
pub use errors::{HostError, LayoutError};
pub use host::{CropRegion, ElementId, Host, LeaderEndCondition, Transaction};
pub use layout::{AlignKind, ArrangeMode, ArrangeReport};
pub use settings::{ArrangeSettings, ElbowPolicy, ElbowRise, LayoutSettings, SlotInset};
pub use types::{BBox, Length, NumericError};
