use crate::schema::{ForeignKey, Migration, MigrationKey, ModelRef, OnDelete, Operation};

pub static MIGRATION: Migration = Migration {
    app: "jobs",
    name: "0010_farmjob_ext_take",
    dependencies: &[
        MigrationKey::new("archive", "0007_auto_20170320_1532"),
        MigrationKey::new("jobs", "0009_farmjob_progress"),
    ],
    // 素材被删除时只清空引用，保留作业记录
    operations: &[Operation::AddForeignKey {
        model: "farmjob",
        field: ForeignKey::new("ext_take", ModelRef::new("archive", "Take"), OnDelete::SetNull)
            .blank()
            .null()
            .related_name("ext_jobs"),
    }],
};
