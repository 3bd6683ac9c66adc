use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use quotesheet_core::{A1Range, Cell, OutputRow, QuotesheetError, SheetRef, SheetStore};

/// One successful `write_region` call, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    /// Sheet written.
    pub target: SheetRef,
    /// A1 range requested.
    pub range: String,
    /// Rows passed by the caller, before any truncation to the region.
    pub rows: Vec<OutputRow>,
}

// (row, col), both 1-based
type Grid = BTreeMap<(u32, u32), String>;

#[derive(Default)]
struct StoreState {
    documents: HashMap<String, HashMap<String, Grid>>,
    writes: Vec<WriteRecord>,
    read_failures: HashMap<SheetRef, QuotesheetError>,
    write_failures: HashMap<SheetRef, QuotesheetError>,
}

impl StoreState {
    fn grid(&self, target: &SheetRef) -> Result<&Grid, QuotesheetError> {
        self.documents
            .get(&target.document)
            .ok_or_else(|| QuotesheetError::DocumentNotFound {
                document: target.document.clone(),
            })?
            .get(&target.sheet)
            .ok_or_else(|| QuotesheetError::SheetNotFound {
                document: target.document.clone(),
                sheet: target.sheet.clone(),
            })
    }

    fn grid_mut(&mut self, target: &SheetRef) -> Result<&mut Grid, QuotesheetError> {
        self.documents
            .get_mut(&target.document)
            .ok_or_else(|| QuotesheetError::DocumentNotFound {
                document: target.document.clone(),
            })?
            .get_mut(&target.sheet)
            .ok_or_else(|| QuotesheetError::SheetNotFound {
                document: target.document.clone(),
                sheet: target.sheet.clone(),
            })
    }
}

/// In-memory spreadsheet service.
///
/// Cells hold text; numbers are stored in their decimal string form. Writes clear
/// the target region first, then lay rows in from its top-left corner. Rows or
/// cells that overflow a bounded region are dropped.
///
/// Clones share the same documents.
#[derive(Clone, Default)]
pub struct MemorySheetStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemorySheetStore {
    /// An empty store with no documents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `sheet` in `document`, creating the document if needed.
    pub async fn add_sheet(&self, document: &str, sheet: &str) {
        let mut guard = self.state.lock().await;
        guard
            .documents
            .entry(document.to_string())
            .or_default()
            .entry(sheet.to_string())
            .or_default();
    }

    /// Fill the first column of `range` top-down with `values`.
    ///
    /// # Errors
    /// Fails if the sheet does not exist or `range` is not valid A1 notation.
    pub async fn set_column(
        &self,
        document: &str,
        sheet: &str,
        range: &str,
        values: &[&str],
    ) -> Result<(), QuotesheetError> {
        let r: A1Range = range.parse()?;
        let target = SheetRef::new(document, sheet);
        let mut guard = self.state.lock().await;
        let grid = guard.grid_mut(&target)?;
        for (row, v) in (r.start_row..).zip(values) {
            grid.insert((row, r.start_col), (*v).to_string());
        }
        Ok(())
    }

    /// Make every later read of the sheet fail with `error`.
    pub async fn fail_reads(&self, document: &str, sheet: &str, error: QuotesheetError) {
        let mut guard = self.state.lock().await;
        guard
            .read_failures
            .insert(SheetRef::new(document, sheet), error);
    }

    /// Make every later write to the sheet fail with `error`.
    pub async fn fail_writes(&self, document: &str, sheet: &str, error: QuotesheetError) {
        let mut guard = self.state.lock().await;
        guard
            .write_failures
            .insert(SheetRef::new(document, sheet), error);
    }

    /// Successful writes, in call order.
    pub async fn writes(&self) -> Vec<WriteRecord> {
        self.state.lock().await.writes.clone()
    }

    /// Text content of `range`, row by row.
    ///
    /// Trailing empty cells of each row and trailing empty rows are dropped.
    ///
    /// # Errors
    /// Fails if the sheet does not exist or `range` is not valid A1 notation.
    pub async fn region(
        &self,
        document: &str,
        sheet: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, QuotesheetError> {
        let r: A1Range = range.parse()?;
        let target = SheetRef::new(document, sheet);
        let guard = self.state.lock().await;
        Ok(read_region(guard.grid(&target)?, r))
    }
}

#[async_trait]
impl SheetStore for MemorySheetStore {
    fn name(&self) -> &'static str {
        "memory-sheets"
    }

    async fn open_sheet(&self, document: &str, sheet: &str) -> Result<SheetRef, QuotesheetError> {
        let target = SheetRef::new(document, sheet);
        self.state.lock().await.grid(&target)?;
        Ok(target)
    }

    async fn read_column(
        &self,
        sheet: &SheetRef,
        range: &str,
    ) -> Result<Vec<String>, QuotesheetError> {
        let r: A1Range = range.parse()?;
        let guard = self.state.lock().await;
        if let Some(e) = guard.read_failures.get(sheet) {
            return Err(e.clone());
        }
        let column = A1Range {
            end_col: r.start_col,
            ..r
        };
        Ok(read_region(guard.grid(sheet)?, column)
            .into_iter()
            .map(|cells| cells.into_iter().next().unwrap_or_default())
            .collect())
    }

    async fn write_region(
        &self,
        sheet: &SheetRef,
        range: &str,
        rows: &[OutputRow],
    ) -> Result<(), QuotesheetError> {
        let r: A1Range = range.parse()?;
        let mut guard = self.state.lock().await;
        if let Some(e) = guard.write_failures.get(sheet) {
            return Err(e.clone());
        }
        let grid = guard.grid_mut(sheet)?;

        grid.retain(|&(row, col), _| {
            let in_rows = row >= r.start_row && r.end_row.is_none_or(|end| row <= end);
            !(in_rows && (r.start_col..=r.end_col).contains(&col))
        });
        let height = r
            .height()
            .map_or(usize::MAX, |h| usize::try_from(h).unwrap_or(usize::MAX));
        let width = usize::try_from(r.width()).unwrap_or(usize::MAX);
        for (row, out) in (r.start_row..).zip(rows.iter().take(height)) {
            for (col, cell) in (r.start_col..).zip(out.cells().iter().take(width)) {
                if let Cell::Number(v) = cell {
                    grid.insert((row, col), v.to_string());
                }
            }
        }

        guard.writes.push(WriteRecord {
            target: sheet.clone(),
            range: range.to_string(),
            rows: rows.to_vec(),
        });
        Ok(())
    }
}

fn read_region(grid: &Grid, r: A1Range) -> Vec<Vec<String>> {
    let columns = r.start_col..=r.end_col;
    let last_row = r.end_row.unwrap_or_else(|| {
        grid.keys()
            .filter(|(_, c)| columns.contains(c))
            .map(|(row, _)| *row)
            .max()
            .unwrap_or(0)
    });
    let mut rows: Vec<Vec<String>> = (r.start_row..=last_row)
        .map(|row| {
            let mut cells: Vec<String> = columns
                .clone()
                .map(|col| grid.get(&(row, col)).cloned().unwrap_or_default())
                .collect();
            while cells.last().is_some_and(String::is_empty) {
                cells.pop();
            }
            cells
        })
        .collect();
    while rows.last().is_some_and(Vec::is_empty) {
        rows.pop();
    }
    rows
}
