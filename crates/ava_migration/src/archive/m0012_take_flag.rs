use crate::schema::{Choice, DefaultValue, Field, Migration, MigrationKey, Operation};

/// 默认值 'none' 不在可选值 [(0, 'dummy')] 中，历史数据如此，保持原样。
/// 严格校验下该迁移会被拒绝。
pub static MIGRATION: Migration = Migration {
    app: "archive",
    name: "0012_take_flag",
    dependencies: &[MigrationKey::new("archive", "0011_auto_20170405_1049")],
    operations: &[Operation::AddField {
        model: "take",
        field: Field::status("flag", 100, &[Choice::int(0, "dummy")], true).default(DefaultValue::Text("none")),
    }],
};
