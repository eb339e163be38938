//! Shared schemas and assertions for reinhardt-reseed-core integration tests.

#![allow(dead_code)]

use reinhardt_reseed_core::prelude::*;

/// `dbo.User(Id, Name, ManagerId -> User.Id)`.
pub fn user_schema() -> DatabaseSchema {
	DatabaseSchema::new(vec![
		TableSchema::new(TableId::new("dbo", "User"))
			.with_columns(["Id", "Name", "ManagerId"])
			.with_primary_key(Key::new(["Id"]))
			.with_foreign_key(ForeignKey::new(
				"FK_User_Manager",
				["ManagerId"],
				TableId::new("dbo", "User"),
				["Id"],
			)),
	])
	.unwrap()
}

/// `dbo.A(Id, BId -> B.Id)` and `dbo.B(Id, AId -> A.Id)`.
pub fn mutual_schema() -> DatabaseSchema {
	DatabaseSchema::new(vec![
		TableSchema::new(TableId::new("dbo", "A"))
			.with_columns(["Id", "BId"])
			.with_primary_key(Key::new(["Id"]))
			.with_foreign_key(ForeignKey::new(
				"FK_A_B",
				["BId"],
				TableId::new("dbo", "B"),
				["Id"],
			)),
		TableSchema::new(TableId::new("dbo", "B"))
			.with_columns(["Id", "AId"])
			.with_primary_key(Key::new(["Id"]))
			.with_foreign_key(ForeignKey::new(
				"FK_B_A",
				["AId"],
				TableId::new("dbo", "A"),
				["Id"],
			)),
	])
	.unwrap()
}

/// Renders a container sequence as `kind row row ...` lines.
pub fn describe(containers: &[TableContainer]) -> Vec<String> {
	containers
		.iter()
		.map(|container| {
			let kind = match container {
				TableContainer::Table(_) => "table",
				TableContainer::MutualTableGroup(_) => "tables",
				TableContainer::MutualRowGroup(_) => "cycle",
			};
			let rows: Vec<String> = container.rows().iter().map(|row| row.to_string()).collect();
			format!("{} {}", kind, rows.join(" ")).trim_end().to_string()
		})
		.collect()
}

/// Reverses a described sequence and the rows within each step.
pub fn mirror(described: &[String]) -> Vec<String> {
	described
		.iter()
		.rev()
		.map(|line| {
			let mut parts: Vec<&str> = line.split(' ').collect();
			parts[1..].reverse();
			parts.join(" ")
		})
		.collect()
}
