use crate::schema::{DefaultValue, Field, Migration, MigrationKey, Operation};

pub static MIGRATION: Migration = Migration {
    app: "archive",
    name: "0007_auto_20170320_1532",
    dependencies: &[MigrationKey::new("archive", "0001_initial")],
    operations: &[
        Operation::AddField {
            model: "take",
            field: Field::integer("rating").default(DefaultValue::Int(0)),
        },
        Operation::AddField {
            model: "take",
            field: Field::float("duration").null(),
        },
    ],
};
