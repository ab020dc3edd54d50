//! Fixed-size occupancy grid shared by every kind of bookable unit.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

use super::error::{AllocationError, AllocationResult};
use super::label::{self, Label, MAX_COLUMNS, MAX_ROWS};

/// Marker for the kind of unit a grid holds.
pub trait UnitKind {
    /// Lowercase noun used in logs and messages.
    const NAME: &'static str;
}

/// Audience seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seat;

/// Vendor stall position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stall;

impl UnitKind for Seat {
    const NAME: &'static str = "seat";
}

impl UnitKind for Stall {
    const NAME: &'static str = "stall";
}

/// `rows x columns` matrix of units, `true` meaning available.
///
/// The dimensions are fixed at construction. The available count is kept in
/// step with the matrix on every successful `book`/`cancel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridAllocator<K> {
    rows: usize,
    columns: usize,
    occupancy: Vec<Vec<bool>>,
    available: usize,
    _kind: PhantomData<K>,
}

impl<K: UnitKind> GridAllocator<K> {
    /// Creates a grid with every unit available.
    ///
    /// A zero dimension yields an empty grid with no capacity.
    pub fn new(rows: usize, columns: usize) -> AllocationResult<Self> {
        let capacity = check_dimensions(rows, columns)?;
        Ok(Self {
            rows,
            columns,
            occupancy: vec![vec![true; columns]; rows],
            available: capacity,
            _kind: PhantomData,
        })
    }

    /// Rebuilds a grid from a stored matrix, checking it matches the dimensions.
    pub fn from_occupancy(
        rows: usize,
        columns: usize,
        occupancy: Vec<Vec<bool>>,
    ) -> AllocationResult<Self> {
        check_dimensions(rows, columns)?;
        if occupancy.len() != rows || occupancy.iter().any(|row| row.len() != columns) {
            return Err(AllocationError::InconsistentState(format!(
                "{} matrix does not match {}x{}",
                K::NAME,
                rows,
                columns
            )));
        }
        let available = occupancy.iter().flatten().filter(|free| **free).count();
        Ok(Self {
            rows,
            columns,
            occupancy,
            available,
            _kind: PhantomData,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Marks `(row, column)` as occupied and returns its label.
    pub fn book(&mut self, row: usize, column: usize) -> AllocationResult<Label> {
        let cell = self.cell_mut(row, column)?;
        if !*cell {
            return Err(AllocationError::AlreadyOccupied {
                label: label::encode(row, column).into_string(),
            });
        }
        *cell = false;
        self.available -= 1;
        Ok(label::encode(row, column))
    }

    /// Marks `(row, column)` as available again and returns its label.
    pub fn cancel(&mut self, row: usize, column: usize) -> AllocationResult<Label> {
        let cell = self.cell_mut(row, column)?;
        if *cell {
            return Err(AllocationError::NotBooked {
                label: label::encode(row, column).into_string(),
            });
        }
        *cell = true;
        self.available += 1;
        Ok(label::encode(row, column))
    }

    pub fn is_available(&self, row: usize, column: usize) -> AllocationResult<bool> {
        self.check_bounds(row, column)?;
        Ok(self.occupancy[row][column])
    }

    pub fn available_count(&self) -> usize {
        self.available
    }

    pub fn occupied_count(&self) -> usize {
        self.total_count() - self.available
    }

    pub fn total_count(&self) -> usize {
        self.rows * self.columns
    }

    /// Row-major view of the matrix.
    pub fn occupancy(&self) -> &[Vec<bool>] {
        &self.occupancy
    }

    /// Labels of all available units, row by row.
    pub fn available_labels(&self) -> Vec<Label> {
        self.labels_where(true)
    }

    /// Labels of all occupied units, row by row.
    pub fn occupied_labels(&self) -> Vec<Label> {
        self.labels_where(false)
    }

    fn labels_where(&self, available: bool) -> Vec<Label> {
        self.occupancy
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .filter(move |(_, free)| **free == available)
                    .map(move |(column, _)| label::encode(row, column))
            })
            .collect()
    }

    fn check_bounds(&self, row: usize, column: usize) -> AllocationResult<()> {
        if row < self.rows && column < self.columns {
            Ok(())
        } else {
            Err(AllocationError::InvalidPosition { row, column })
        }
    }

    fn cell_mut(&mut self, row: usize, column: usize) -> AllocationResult<&mut bool> {
        self.check_bounds(row, column)?;
        Ok(&mut self.occupancy[row][column])
    }
}

// Capacity of a `rows x columns` grid, if those dimensions are allowed
fn check_dimensions(rows: usize, columns: usize) -> AllocationResult<usize> {
    if rows > MAX_ROWS || columns > MAX_COLUMNS {
        return Err(AllocationError::InvalidDimensions { rows, columns });
    }
    rows.checked_mul(columns)
        .ok_or(AllocationError::InvalidDimensions { rows, columns })
}

impl<K: UnitKind> fmt::Display for GridAllocator<K> {
    /// Renders the console seat map: `[X]` occupied, `[ ]` available, with an
    /// aisle gap after the first half of the columns.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let aisle = self.columns / 2;
        write!(f, "   ")?;
        for column in 0..self.columns {
            if column == aisle && column > 0 {
                write!(f, "  ")?;
            }
            write!(f, " {}  ", label::column_letter(column))?;
        }
        writeln!(f)?;
        for (row, cells) in self.occupancy.iter().enumerate() {
            write!(f, "{:2} ", row + 1)?;
            for (column, free) in cells.iter().enumerate() {
                if column == aisle && column > 0 {
                    write!(f, "  ")?;
                }
                write!(f, "{} ", if *free { "[ ]" } else { "[X]" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct GridDocumentRef<'a> {
    rows: usize,
    columns: usize,
    occupancy: &'a [Vec<bool>],
}

#[derive(Deserialize)]
struct GridDocument {
    rows: usize,
    columns: usize,
    occupancy: Vec<Vec<bool>>,
}

impl<K: UnitKind> Serialize for GridAllocator<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GridDocumentRef {
            rows: self.rows,
            columns: self.columns,
            occupancy: &self.occupancy,
        }
        .serialize(serializer)
    }
}

impl<'de, K: UnitKind> Deserialize<'de> for GridAllocator<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let doc = GridDocument::deserialize(deserializer)?;
        Self::from_occupancy(doc.rows, doc.columns, doc.occupancy).map_err(de::Error::custom)
    }
}
