//! Global coordinate systems for multi-tile flow cells.
//!
//! Each tile of an Illumina NovaSeq S4 flow cell can be used as a capture
//! area ("puck"). [`coordinate_system`] places every tile of a flow cell in
//! one global (x, y, z) frame so tiles can be stitched together, and names
//! them with a user-supplied [`NameTemplate`]:
//!
//! ```rust
//! use puck_matcher::flowcell::{coordinate_system, FlowcellLayout, NameTemplate};
//!
//! let template = NameTemplate::parse("L{lane}{side_letter}_tile_{side_number}{column}{row:02d}").unwrap();
//! let pucks = coordinate_system(&FlowcellLayout::default(), &template);
//! assert_eq!(pucks[0].puck_id, "L1a_tile_1101");
//! ```

pub mod coordinates;
pub mod template;

pub use coordinates::{coordinate_system, write_coordinates, FlowcellLayout, PuckCoordinate};
pub use template::{NameTemplate, TemplateError, TileFields};
