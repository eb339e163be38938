//! Convenience re-exports for common usage.
//!
//! ```
//! use reinhardt_reseed_core::prelude::*;
//!
//! let options = ReseedOptions::new().with_allow_row_cycles(false);
//! let planner = ReseedPlanner::new(options);
//! assert!(!planner.options().allow_row_cycles);
//! ```

// Error types
pub use crate::error::{ReseedError, ReseedResult};

// Schema types
pub use crate::schema::{
	Column, DatabaseSchema, ForeignKey, ForeignKeyRef, Key, TableId, TableNode, TableRef,
	TableSchema,
};

// Values and rows
pub use crate::row::{Row, RowIdent, RowKey, RowNode, RowRef, RowSet};
pub use crate::value::{CellValue, KeyValue};

// Entity types
pub use crate::provider::{
	Entity, EntityFormat, EntityParser, EntityProvider, EntityRecord, FileEntityProvider,
	InlineProvider, Origin, Property,
};

// Planning types
pub use crate::container::{
	MutualRowGroup, MutualTableGroup, TableBatch, TableContainer, TableData,
};
pub use crate::matcher::RowMatcher;
pub use crate::options::{CleanupScope, NameMatching, ReseedOptions};
pub use crate::planner::{PlanSummary, ReseedPlan, ReseedPlanner};
pub use crate::refine::{Direction, TableMutualReferenceResolver};
