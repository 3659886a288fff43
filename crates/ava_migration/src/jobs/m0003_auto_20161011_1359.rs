use crate::schema::{Field, ForeignKey, Migration, MigrationKey, ModelRef, OnDelete, Operation};

pub static MIGRATION: Migration = Migration {
    app: "jobs",
    name: "0003_auto_20161011_1359",
    dependencies: &[MigrationKey::new("jobs", "0002_auto_20161011_1336")],
    operations: &[
        Operation::AddField {
            model: "farmjob",
            field: Field::char("exception", 800).null(),
        },
        // 节点被删除时，其上的作业一并删除
        Operation::AddForeignKey {
            model: "farmjob",
            field: ForeignKey::new("node", ModelRef::new("jobs", "FarmNode"), OnDelete::Cascade).null(),
        },
        Operation::AddField {
            model: "farmjob",
            field: Field::char("params", 800).null(),
        },
    ],
};
