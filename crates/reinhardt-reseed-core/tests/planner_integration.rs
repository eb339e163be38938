//! End-to-end planning over realistic schemas.

mod helpers;

use helpers::{describe, mirror, mutual_schema, user_schema};
use reinhardt_reseed_core::prelude::*;
use rstest::rstest;

fn users() -> Vec<Entity> {
	InlineProvider::new()
		.with_entities([
			Entity::new("User")
				.with_property("Id", 3)
				.with_property("Name", "carol")
				.with_property("ManagerId", 2),
			Entity::new("User")
				.with_property("Id", 1)
				.with_property("Name", "alice")
				.with_property("ManagerId", None::<i64>),
			Entity::new("User")
				.with_property("Id", 2)
				.with_property("Name", "bob")
				.with_property("ManagerId", 1),
			Entity::new("User")
				.with_property("Id", 4)
				.with_property("Name", "dave")
				.with_property("ManagerId", 4),
		])
		.entities()
		.unwrap()
}

#[rstest]
fn test_managers_are_inserted_before_their_reports() {
	// Arrange
	let schema = user_schema();
	let planner = ReseedPlanner::new(ReseedOptions::default());

	// Act
	let plan = planner.plan_entities(&schema, &users()).unwrap();

	// Assert
	assert_eq!(
		describe(plan.insert()),
		["tables dbo.User(1) dbo.User(2) dbo.User(3)", "cycle dbo.User(4)"]
	);
	let TableContainer::MutualRowGroup(cycle) = &plan.insert()[1] else {
		panic!("expected a row cycle");
	};
	assert_eq!(cycle.foreign_keys.len(), 1);
	assert_eq!(cycle.foreign_keys[0].name, "FK_User_Manager");
	assert_eq!(
		plan.summary(),
		PlanSummary {
			tables: 1,
			rows: 4,
			table_groups: 1,
			row_groups: 1,
			disabled_foreign_keys: 1,
		}
	);
}

#[rstest]
fn test_cleanup_mirrors_insertion() {
	let schema = user_schema();

	let plan = ReseedPlanner::default()
		.plan_entities(&schema, &users())
		.unwrap();

	assert_eq!(describe(plan.cleanup()), mirror(&describe(plan.insert())));
}

#[rstest]
fn test_row_cycles_can_be_rejected() {
	// Arrange
	let schema = user_schema();
	let planner = ReseedPlanner::new(ReseedOptions::new().with_allow_row_cycles(false));

	// Act
	let result = planner.plan_entities(&schema, &users());

	// Assert
	match result {
		Err(ReseedError::RowCycleNotAllowed { rows }) => assert_eq!(rows, ["dbo.User(4)"]),
		other => panic!("expected a row cycle error, got {:?}", other.map(|plan| plan.summary())),
	}
}

#[rstest]
#[case::default_options(ReseedOptions::default())]
#[case::rejecting_cycles(ReseedOptions::new().with_allow_row_cycles(false))]
fn test_null_foreign_keys_break_table_cycles(#[case] options: ReseedOptions) {
	// Arrange
	let schema = mutual_schema();
	let entities = InlineProvider::new()
		.with_entities([
			Entity::new("A").with_property("Id", 1).with_property("BId", None::<i64>),
			Entity::new("B").with_property("Id", 1).with_property("AId", 1),
			Entity::new("A").with_property("Id", 2).with_property("BId", 1),
		])
		.entities()
		.unwrap();

	// Act
	let plan = ReseedPlanner::new(options)
		.plan_entities(&schema, &entities)
		.unwrap();

	// Assert
	assert_eq!(
		describe(plan.insert()),
		["tables dbo.A(1) dbo.B(1) dbo.A(2)"]
	);
	let TableContainer::MutualTableGroup(group) = &plan.insert()[0] else {
		panic!("expected a table group");
	};
	assert_eq!(group.batches.len(), 3);
	assert_eq!(plan.summary().row_groups, 0);
}

#[rstest]
fn test_rows_closing_a_table_cycle_form_a_row_group() {
	let schema = mutual_schema();
	let entities = InlineProvider::new()
		.with_entities([
			Entity::new("A").with_property("Id", 1).with_property("BId", 1),
			Entity::new("B").with_property("Id", 1).with_property("AId", 1),
			Entity::new("B").with_property("Id", 2).with_property("AId", None::<i64>),
		])
		.entities()
		.unwrap();

	let plan = ReseedPlanner::default()
		.plan_entities(&schema, &entities)
		.unwrap();

	assert_eq!(
		describe(plan.insert()),
		["cycle dbo.A(1) dbo.B(1)", "tables dbo.B(2)"]
	);
	let summary = plan.summary();
	assert_eq!(summary.row_groups, 1);
	assert_eq!(summary.disabled_foreign_keys, 2);
	assert_eq!(describe(plan.cleanup()), mirror(&describe(plan.insert())));
}

#[rstest]
fn test_cycle_through_an_empty_table_disappears() {
	// Arrange
	let schema = DatabaseSchema::new(vec![
		TableSchema::new(TableId::new("dbo", "A"))
			.with_columns(["Id", "BId"])
			.with_primary_key(Key::new(["Id"]))
			.with_foreign_key(ForeignKey::new("FK_A_B", ["BId"], TableId::new("dbo", "B"), ["Id"])),
		TableSchema::new(TableId::new("dbo", "B"))
			.with_columns(["Id", "CId"])
			.with_primary_key(Key::new(["Id"]))
			.with_foreign_key(ForeignKey::new("FK_B_C", ["CId"], TableId::new("dbo", "C"), ["Id"])),
		TableSchema::new(TableId::new("dbo", "C"))
			.with_columns(["Id", "AId"])
			.with_primary_key(Key::new(["Id"]))
			.with_foreign_key(ForeignKey::new("FK_C_A", ["AId"], TableId::new("dbo", "A"), ["Id"])),
	])
	.unwrap();
	let entities = InlineProvider::new()
		.with_entities([
			Entity::new("A").with_property("Id", 1).with_property("BId", 1),
			Entity::new("B").with_property("Id", 1),
		])
		.entities()
		.unwrap();

	// Act
	let skipping = ReseedPlanner::default()
		.plan_entities(&schema, &entities)
		.unwrap();
	let keeping = ReseedPlanner::new(ReseedOptions::new().with_skip_empty_tables(false))
		.plan_entities(&schema, &entities)
		.unwrap();

	// Assert
	assert_eq!(
		describe(skipping.insert()),
		["table dbo.B(1)", "table dbo.A(1)"]
	);
	assert!(keeping.table_graph().has_cycles());
	assert_eq!(describe(keeping.insert()), ["tables dbo.B(1) dbo.A(1)"]);
	assert_eq!(keeping.insert()[0].tables().len(), 3);
}

#[rstest]
fn test_plan_summary_is_logged() {
	use std::sync::{Arc, Mutex};
	use tracing_subscriber::layer::SubscriberExt as _;
	use tracing_subscriber::util::SubscriberInitExt as _;

	// Arrange
	/// A tracing layer that captures event messages with their level.
	struct LogCapture {
		logs: Arc<Mutex<Vec<String>>>,
	}

	impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCapture {
		fn on_event(
			&self,
			event: &tracing::Event<'_>,
			_ctx: tracing_subscriber::layer::Context<'_, S>,
		) {
			struct MessageVisitor {
				message: String,
			}

			impl tracing::field::Visit for MessageVisitor {
				fn record_debug(
					&mut self,
					field: &tracing::field::Field,
					value: &dyn std::fmt::Debug,
				) {
					if field.name() == "message" {
						self.message = format!("{:?}", value);
					}
				}
			}

			let mut visitor = MessageVisitor {
				message: String::new(),
			};
			event.record(&mut visitor);

			let mut logs = self.logs.lock().unwrap();
			logs.push(format!(
				"[{}] {}",
				event.metadata().level(),
				visitor.message
			));
		}
	}

	let logs = Arc::new(Mutex::new(Vec::new()));
	let capture = LogCapture { logs: logs.clone() };
	let _guard = tracing_subscriber::registry().with(capture).set_default();
	let schema = user_schema();

	// Act
	ReseedPlanner::default()
		.plan_entities(&schema, &users())
		.unwrap();

	// Assert
	let captured = logs.lock().unwrap();
	assert!(
		captured
			.iter()
			.any(|log| log.contains("INFO") && log.contains("planned reseed")),
		"Expected a plan summary log, but got: {:?}",
		*captured
	);
	assert!(
		captured.iter().any(|log| log.contains("found table cycle")),
		"Expected a table cycle log, but got: {:?}",
		*captured
	);
}
