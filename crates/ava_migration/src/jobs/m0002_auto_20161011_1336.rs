use crate::schema::{DefaultValue, Field, Migration, MigrationKey, Operation};

pub static MIGRATION: Migration = Migration {
    app: "jobs",
    name: "0002_auto_20161011_1336",
    dependencies: &[MigrationKey::new("jobs", "0001_initial")],
    operations: &[
        Operation::AddField {
            model: "farmnode",
            field: Field::char("code_version", 40).null(),
        },
        Operation::AddField {
            model: "farmnode",
            field: Field::boolean("req_restart").default(DefaultValue::Bool(false)),
        },
    ],
};
