// ABOUTME: Surface module — the document-tree capability boundary and its scripted implementation.
// ABOUTME: Everything above this module is host-UI agnostic.

pub mod dom;
pub mod scripted;

pub use dom::{Activation, DomSurface, Mutation, NodeHandle};
pub use scripted::{ClickEffect, ScriptedSurface};
