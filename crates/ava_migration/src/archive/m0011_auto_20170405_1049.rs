use crate::schema::{DefaultValue, Field, Migration, MigrationKey, Operation};

pub static MIGRATION: Migration = Migration {
    app: "archive",
    name: "0011_auto_20170405_1049",
    dependencies: &[MigrationKey::new("archive", "0007_auto_20170320_1532")],
    operations: &[
        Operation::AddField {
            model: "take",
            field: Field::integer("frame_count").default(DefaultValue::Int(0)),
        },
        Operation::AddField {
            model: "take",
            field: Field::boolean("is_test").default(DefaultValue::Bool(false)),
        },
    ],
};
