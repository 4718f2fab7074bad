//! Layout engine: alignment, distribution and two-column arrangement.
//!
//! The engine never talks to a document directly. [`adapter::prepare`]
//! turns host elements into [`AnnotationElement`] records, the pure planners
//! in [`align`] and [`arrange`] compute [`Placement`]s, and
//! [`adapter::apply`] writes them back inside the caller's scope.

pub mod adapter;
pub mod align;
pub mod arrange;
pub mod defaults;
pub mod kinds;
pub mod leader;

pub use adapter::{AnnotationElement, Handle, LeaderUpdate, Placement};
pub use align::AlignKind;
pub use arrange::{ArrangeMode, ArrangeReport, Side};
pub use kinds::{AnchoredTag, AnnotationKind, Capabilities, FreeNote, Other, SpatialAreaTag};
pub use leader::LeaderSegment;
