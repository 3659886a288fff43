use crate::schema::{Field, Migration, MigrationKey, Operation};

pub static MIGRATION: Migration = Migration {
    app: "jobs",
    name: "0009_farmjob_progress",
    dependencies: &[MigrationKey::new("jobs", "0003_auto_20161011_1359")],
    operations: &[Operation::AddField {
        model: "farmjob",
        field: Field::char("progress", 200).null(),
    }],
};
