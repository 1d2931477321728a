use serde::Serialize;
use std::path::Path;

use crate::flowcell::template::{NameTemplate, TileFields};

/// Geometry of a flow cell, in the units of the offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowcellLayout {
    pub n_lanes: u32,
    pub columns: u32,
    pub rows: u32,
    /// Distance between adjacent columns
    pub x_offset: i64,
    /// Distance between adjacent rows
    pub y_offset: i64,
    /// Extra y shift applied to odd columns
    pub swath_offset_odd: i64,
    /// Extra y shift applied to even columns
    pub swath_offset_even: i64,
    /// Start lane, column and row numbering at 0 instead of 1
    pub zero_coded: bool,
}

impl Default for FlowcellLayout {
    /// NovaSeq S4 layout
    fn default() -> Self {
        Self {
            n_lanes: 4,
            columns: 6,
            rows: 78,
            x_offset: 33_809,
            y_offset: 36_342,
            swath_offset_odd: 0,
            swath_offset_even: 6201,
            zero_coded: false,
        }
    }
}

/// Position of one tile in the global frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PuckCoordinate {
    pub puck_id: String,
    pub x_offset: i64,
    pub y_offset: i64,
    pub z_offset: i64,
}

/// Place every tile of the flow cell, lane by lane, side by side, column by column
#[must_use]
pub fn coordinate_system(layout: &FlowcellLayout, template: &NameTemplate) -> Vec<PuckCoordinate> {
    let start = u32::from(!layout.zero_coded);
    let mut pucks = Vec::new();

    for lane in start..start + layout.n_lanes {
        for side_number in [1, 2] {
            for column in start..start + layout.columns {
                for row in start..start + layout.rows {
                    let swath_offset = if column % 2 == 0 {
                        layout.swath_offset_even
                    } else {
                        layout.swath_offset_odd
                    };

                    let fields = TileFields {
                        lane,
                        side_number,
                        column,
                        row,
                    };

                    pucks.push(PuckCoordinate {
                        puck_id: template.render(&fields),
                        x_offset: i64::from(column) * layout.x_offset,
                        y_offset: i64::from(row) * layout.y_offset + swath_offset,
                        z_offset: 0,
                    });
                }
            }
        }
    }

    pucks
}

/// Write the coordinate table as CSV
///
/// # Errors
///
/// Returns a `csv::Error` if the file cannot be created or written.
pub fn write_coordinates(path: &Path, pucks: &[PuckCoordinate]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for puck in pucks {
        writer.serialize(puck)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn default_template() -> NameTemplate {
        NameTemplate::parse("L{lane}{side_letter}_tile_{side_number}{column}{row:02d}").unwrap()
    }

    #[test]
    fn test_novaseq_s4_layout() {
        let pucks = coordinate_system(&FlowcellLayout::default(), &default_template());
        assert_eq!(pucks.len(), 4 * 2 * 6 * 78);

        assert_eq!(pucks[0].puck_id, "L1a_tile_1101");
        assert_eq!(pucks[0].x_offset, 33_809);
        assert_eq!(pucks[0].y_offset, 36_342);

        // Second column of the first lane/side is shifted by the even swath offset
        let second_column = &pucks[78];
        assert_eq!(second_column.puck_id, "L1a_tile_1201");
        assert_eq!(second_column.x_offset, 2 * 33_809);
        assert_eq!(second_column.y_offset, 36_342 + 6201);

        let last = pucks.last().unwrap();
        assert_eq!(last.puck_id, "L4b_tile_2678");
        assert!(pucks.iter().all(|p| p.z_offset == 0));
    }

    #[test]
    fn test_zero_coded_layout() {
        let layout = FlowcellLayout {
            n_lanes: 1,
            columns: 2,
            rows: 2,
            zero_coded: true,
            ..FlowcellLayout::default()
        };
        let pucks = coordinate_system(&layout, &default_template());
        let ids: Vec<&str> = pucks.iter().map(|p| p.puck_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "L0a_tile_1000",
                "L0a_tile_1001",
                "L0a_tile_1100",
                "L0a_tile_1101",
                "L0b_tile_2000",
                "L0b_tile_2001",
                "L0b_tile_2100",
                "L0b_tile_2101",
            ]
        );
        assert_eq!(pucks[0].x_offset, 0);
        assert_eq!(pucks[0].y_offset, 6201);
    }

    #[test]
    fn test_write_coordinates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("coords.csv");
        let layout = FlowcellLayout {
            n_lanes: 1,
            columns: 1,
            rows: 1,
            ..FlowcellLayout::default()
        };
        write_coordinates(&path, &coordinate_system(&layout, &default_template())).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "puck_id,x_offset,y_offset,z_offset");
        assert_eq!(lines[1], "L1a_tile_1101,33809,36342,0");
        assert_eq!(lines.len(), 3);
    }
}
