//! # Frame Model
//!
//! Clean DTOs that define the frame-based instance model.
//! These types cross every boundary: schema ↔ matcher ↔ network ↔ regeneration.
//!
//! Design rule: NO schema logic, NO matcher logic here.
//! This module is pure data — no I/O, no state.

pub mod frame;
pub mod graph;
pub mod ident;
pub mod range;

pub use frame::{Frame, FrameCategory, Slot, SlotValues, TypeTag};
pub use graph::InstanceGraph;
pub use ident::{ConceptId, FrameId, InstanceId, PropertyId};
pub use range::NumberRange;
