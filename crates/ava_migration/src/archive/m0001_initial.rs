use crate::schema::{Field, Migration, Operation};

pub static MIGRATION: Migration = Migration {
    app: "archive",
    name: "0001_initial",
    dependencies: &[],
    operations: &[Operation::CreateModel {
        model: "take",
        fields: &[
            Field::auto("id"),
            Field::char("name", 200),
            Field::datetime("capture_time").null(),
            Field::char("comment", 500).null().blank(),
        ],
    }],
};
