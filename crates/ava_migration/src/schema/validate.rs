//! 迁移记录的静态校验

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use super::{format_choices, graph, Field, FieldKind, ForeignKey, Migration, OnDelete, Operation};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("迁移重复声明: {migration}")]
    DuplicateMigration { migration: String },
    #[error("迁移 {migration} 依赖的 {dependency} 不存在")]
    UnknownDependency { migration: String, dependency: String },
    #[error("迁移 {migration} 依赖的 {dependency} 未排在它之前")]
    ForwardReference { migration: String, dependency: String },
    #[error("迁移依赖存在环: {}", members.join(", "))]
    Cycle { members: Vec<String> },
    #[error(
        "配置不一致: 迁移 {migration} 中 {model}.{field} 的默认值 {default} 不在可选值 {choices} 中"
    )]
    ChoiceMismatch {
        migration: String,
        model: String,
        field: String,
        default: String,
        choices: String,
    },
    #[error("迁移 {migration} 中 {model}.{field} 定义无效: {reason}")]
    InvalidField {
        migration: String,
        model: String,
        field: String,
        reason: String,
    },
    #[error("迁移 {migration} 重复添加列 {table}.{column}")]
    DuplicateField {
        migration: String,
        table: String,
        column: String,
    },
}

/// 校验严格程度
///
/// 宽松模式尊重字段上的 `no_check_for_status`，严格模式下默认值必须属于可选值。
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Strictness {
    #[default]
    Lenient,
    Strict,
}

fn invalid(record: &Migration, model: &str, field: &str, reason: impl Into<String>) -> SchemaError {
    SchemaError::InvalidField {
        migration: record.label(),
        model: model.to_string(),
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn check_field(record: &Migration, model: &str, field: &Field, strictness: Strictness) -> Result<(), SchemaError> {
    if field.kind.max_length() == Some(0) {
        return Err(invalid(record, model, field.name, "max_length 必须大于 0"));
    }
    if !field.null && field.default == super::DefaultValue::Null {
        return Err(invalid(record, model, field.name, "非空字段不能以 NULL 作为默认值"));
    }

    if let FieldKind::Status {
        choices,
        no_check_for_status,
        ..
    } = field.kind
    {
        if choices.is_empty() {
            return Err(invalid(record, model, field.name, "状态字段必须声明可选值"));
        }
        if !choices.iter().any(|choice| field.default.matches(&choice.value)) {
            let mismatch = SchemaError::ChoiceMismatch {
                migration: record.label(),
                model: model.to_string(),
                field: field.name.to_string(),
                default: field.default.to_string(),
                choices: format_choices(choices),
            };
            if strictness == Strictness::Strict || !no_check_for_status {
                return Err(mismatch);
            }
            warn!("{}（字段声明了 no_check_for_status，按原样保留）", mismatch);
        }
    }
    Ok(())
}

fn check_foreign_key(record: &Migration, model: &str, fk: &ForeignKey) -> Result<(), SchemaError> {
    if fk.to.app.is_empty() || fk.to.model.is_empty() {
        return Err(invalid(record, model, fk.name, "外键必须以 app.Model 形式引用目标模型"));
    }
    if fk.on_delete == OnDelete::SetNull && !fk.null {
        return Err(invalid(record, model, fk.name, "SET_NULL 外键必须允许为空"));
    }
    Ok(())
}

/// 校验单条迁移中所有操作的字段定义
pub fn check_migration(record: &Migration, strictness: Strictness) -> Result<(), SchemaError> {
    for operation in record.operations {
        match operation {
            Operation::CreateModel { model, fields } => {
                let mut seen = HashSet::new();
                for field in *fields {
                    if !seen.insert(field.name) {
                        return Err(SchemaError::DuplicateField {
                            migration: record.label(),
                            table: operation.table(record.app),
                            column: field.name.to_string(),
                        });
                    }
                    check_field(record, model, field, strictness)?;
                }
            }
            Operation::AddField { model, field } => check_field(record, model, field, strictness)?,
            Operation::AddForeignKey { model, field } => check_foreign_key(record, model, field)?,
        }
    }
    Ok(())
}

/// 完整校验：依赖图、字段定义以及跨迁移的重复列
///
/// 成功时返回可执行顺序。
pub fn check<'a>(records: &[&'a Migration], strictness: Strictness) -> Result<Vec<&'a Migration>, SchemaError> {
    let ordered = graph::plan(records)?;
    let mut columns: HashSet<(String, String)> = HashSet::new();
    for record in &ordered {
        check_migration(record, strictness)?;
        for operation in record.operations {
            let table = operation.table(record.app);
            for column in operation.columns() {
                if !columns.insert((table.clone(), column.clone())) {
                    return Err(SchemaError::DuplicateField {
                        migration: record.label(),
                        table,
                        column,
                    });
                }
            }
        }
    }
    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::schema::{Choice, DefaultValue, MigrationKey, ModelRef};
    use crate::{archive, REGISTRY};

    static UNCHECKED_STATUS: Migration = Migration {
        app: "demo",
        name: "0001_status",
        dependencies: &[],
        operations: &[Operation::AddField {
            model: "job",
            field: Field::status("state", 20, &[Choice::text("ready", "Ready")], false)
                .default(DefaultValue::Text("queued")),
        }],
    };
    static VALID_STATUS: Migration = Migration {
        app: "demo",
        name: "0002_status",
        dependencies: &[],
        operations: &[Operation::AddField {
            model: "job",
            field: Field::status("phase", 20, &[Choice::text("ready", "Ready"), Choice::text("done", "Done")], false)
                .default(DefaultValue::Text("ready")),
        }],
    };
    static NOT_NULL_SET_NULL: Migration = Migration {
        app: "demo",
        name: "0003_fk",
        dependencies: &[],
        operations: &[Operation::AddForeignKey {
            model: "job",
            field: ForeignKey::new("owner", ModelRef::new("demo", "Owner"), OnDelete::SetNull),
        }],
    };
    static ZERO_LENGTH: Migration = Migration {
        app: "demo",
        name: "0004_char",
        dependencies: &[],
        operations: &[Operation::AddField {
            model: "job",
            field: Field::char("title", 0),
        }],
    };
    static TWICE: Migration = Migration {
        app: "demo",
        name: "0005_twice",
        dependencies: &[MigrationKey::new("demo", "0002_status")],
        operations: &[Operation::AddField {
            model: "job",
            field: Field::char("phase", 20).null(),
        }],
    };

    #[test]
    fn test_take_flag_default_outside_choices() {
        let flag = &archive::m0012_take_flag::MIGRATION;
        let err = check_migration(flag, Strictness::Strict).unwrap_err();
        assert_matches!(
            err,
            SchemaError::ChoiceMismatch { ref migration, ref model, ref field, ref default, ref choices }
                if migration == "archive.0012_take_flag"
                    && model == "take"
                    && field == "flag"
                    && default == "'none'"
                    && choices == "[(0, 'dummy')]"
        );
        // 宽松模式尊重 no_check_for_status，按原样放行
        assert!(check_migration(flag, Strictness::Lenient).is_ok());
    }

    #[test]
    fn test_status_mismatch_without_opt_out_always_fails() {
        assert_matches!(
            check_migration(&UNCHECKED_STATUS, Strictness::Lenient),
            Err(SchemaError::ChoiceMismatch { .. })
        );
        assert!(check_migration(&VALID_STATUS, Strictness::Strict).is_ok());
    }

    #[test]
    fn test_set_null_requires_nullable() {
        assert_matches!(
            check_migration(&NOT_NULL_SET_NULL, Strictness::Lenient),
            Err(SchemaError::InvalidField { ref field, .. }) if field == "owner"
        );
    }

    #[test]
    fn test_zero_length_char() {
        assert_matches!(
            check_migration(&ZERO_LENGTH, Strictness::Lenient),
            Err(SchemaError::InvalidField { .. })
        );
    }

    #[test]
    fn test_duplicate_column_across_migrations() {
        let err = check(&[&VALID_STATUS, &TWICE], Strictness::Lenient).unwrap_err();
        assert_matches!(
            err,
            SchemaError::DuplicateField { ref table, ref column, .. } if table == "demo_job" && column == "phase"
        );
    }

    #[test]
    fn test_registry_checks() {
        let ordered = check(REGISTRY, Strictness::Lenient).unwrap();
        assert_eq!(ordered.len(), REGISTRY.len());
        assert_matches!(
            check(REGISTRY, Strictness::Strict),
            Err(SchemaError::ChoiceMismatch { ref migration, .. }) if migration == "archive.0012_take_flag"
        );
    }

    #[test]
    fn test_strictness_parse() {
        assert_eq!("strict".parse::<Strictness>().unwrap(), Strictness::Strict);
        assert_eq!("Lenient".parse::<Strictness>().unwrap(), Strictness::Lenient);
        assert!("loose".parse::<Strictness>().is_err());
        assert_eq!(Strictness::default().to_string(), "lenient");
    }
}
