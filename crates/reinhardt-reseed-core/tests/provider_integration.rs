//! Planning entities read from entity files.

mod helpers;

use std::fs;

use helpers::{describe, user_schema};
use reinhardt_reseed_core::prelude::*;
use rstest::rstest;
use tempfile::TempDir;

#[rstest]
fn test_plan_entities_from_directory() {
	// Arrange
	let dir = TempDir::new().unwrap();
	fs::write(
		dir.path().join("01_managers.json"),
		r#"{"entity": "dbo.User", "values": {"Id": 1, "Name": "alice", "ManagerId": null}}"#,
	)
	.unwrap();
	fs::write(
		dir.path().join("02_reports.json"),
		r#"[
			{"entity": "User", "values": {"Id": 3, "Name": "carol", "ManagerId": 2}},
			{"entity": "user", "values": {"Id": 2, "Name": "bob", "ManagerId": 1}}
		]"#,
	)
	.unwrap();
	let provider = FileEntityProvider::new().with_path(dir.path());

	// Act
	let plan = ReseedPlanner::default()
		.plan_provider(&user_schema(), &provider)
		.unwrap();

	// Assert
	assert_eq!(
		describe(plan.insert()),
		["tables dbo.User(1) dbo.User(2) dbo.User(3)"]
	);
	let origins: Vec<String> = plan.insert()[0]
		.rows()
		.iter()
		.map(|row| row.origin().to_string())
		.collect();
	assert!(origins[0].ends_with("01_managers.json#0"));
	assert!(origins[1].ends_with("02_reports.json#1"));
	assert!(origins[2].ends_with("02_reports.json#0"));
}

#[rstest]
fn test_errors_name_the_record_origin() {
	let dir = TempDir::new().unwrap();
	let path = dir.path().join("users.json");
	fs::write(
		&path,
		r#"[
			{"entity": "User", "values": {"Id": 1}},
			{"entity": "User", "values": {"Id": 2, "Email": "bob@example.com"}}
		]"#,
	)
	.unwrap();
	let provider = FileEntityProvider::new().with_path(&path);

	let result = ReseedPlanner::default().plan_provider(&user_schema(), &provider);

	match result {
		Err(error @ ReseedError::UnknownColumn { .. }) => {
			let message = error.to_string();
			assert!(message.contains("Email"), "unexpected message: {}", message);
			assert!(message.contains("users.json#1"), "unexpected message: {}", message);
		}
		other => panic!("expected an unknown column error, got {:?}", other.map(|plan| plan.summary())),
	}
}

#[rstest]
fn test_exact_matching_from_options_file() {
	// Arrange
	let dir = TempDir::new().unwrap();
	let options_path = dir.path().join("reseed.toml");
	fs::write(&options_path, "entity_name_matching = \"exact\"\n").unwrap();
	let options = ReseedOptions::from_path(&options_path).unwrap();
	let entities = InlineProvider::new()
		.with_entity(Entity::new("user").with_property("Id", 1))
		.entities()
		.unwrap();

	// Act
	let result = ReseedPlanner::new(options).plan_entities(&user_schema(), &entities);

	// Assert
	assert!(matches!(result, Err(ReseedError::UnknownTable { name, .. }) if name == "user"));
}

#[cfg(feature = "yaml")]
#[rstest]
fn test_plan_entities_from_yaml() {
	let dir = TempDir::new().unwrap();
	let path = dir.path().join("users.yaml");
	fs::write(
		&path,
		"- entity: User\n  values:\n    Id: 2\n    ManagerId: 1\n- entity: User\n  values:\n    Id: 1\n",
	)
	.unwrap();

	let plan = ReseedPlanner::default()
		.plan_provider(&user_schema(), &FileEntityProvider::new().with_path(&path))
		.unwrap();

	assert_eq!(describe(plan.insert()), ["tables dbo.User(1) dbo.User(2)"]);
}
