//! 迁移记录的声明式数据模型
//!
//! 每条迁移只是静态数据：所属 app、名称、依赖的前置迁移以及有序的操作列表。
//! 记录在编写后不再修改，执行顺序与已应用状态由 sea-orm-migration 负责。

pub mod apply;
pub mod graph;
pub mod validate;

use std::fmt;

use serde::Serialize;

/// 迁移的全局标识：`app.name`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MigrationKey {
    pub app: &'static str,
    pub name: &'static str,
}

impl MigrationKey {
    pub const fn new(app: &'static str, name: &'static str) -> Self {
        Self { app, name }
    }
}

impl fmt::Display for MigrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.app, self.name)
    }
}

/// 一条迁移记录
#[derive(Debug, Serialize)]
pub struct Migration {
    pub app: &'static str,
    pub name: &'static str,
    pub dependencies: &'static [MigrationKey],
    pub operations: &'static [Operation],
}

impl Migration {
    pub const fn key(&self) -> MigrationKey {
        MigrationKey::new(self.app, self.name)
    }

    /// 写入 seaql_migrations 的版本号，同时用于日志
    pub fn label(&self) -> String {
        self.key().to_string()
    }
}

/// 单个结构变更
#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    CreateModel {
        model: &'static str,
        fields: &'static [Field],
    },
    AddField {
        model: &'static str,
        field: Field,
    },
    AddForeignKey {
        model: &'static str,
        field: ForeignKey,
    },
}

impl Operation {
    pub fn model(&self) -> &'static str {
        match self {
            Operation::CreateModel { model, .. }
            | Operation::AddField { model, .. }
            | Operation::AddForeignKey { model, .. } => *model,
        }
    }

    /// 操作作用的表名，模型总是属于迁移所在的 app
    pub fn table(&self, app: &str) -> String {
        table_name(app, self.model())
    }

    /// 该操作新增的列名
    pub fn columns(&self) -> Vec<String> {
        match self {
            Operation::CreateModel { fields, .. } => fields.iter().map(|f| f.name.to_string()).collect(),
            Operation::AddField { field, .. } => vec![field.name.to_string()],
            Operation::AddForeignKey { field, .. } => vec![field.column()],
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Operation::CreateModel { model, fields } => {
                format!("创建模型 {}（{} 个字段）", model, fields.len())
            }
            Operation::AddField { model, field } => {
                format!("为 {} 添加字段 {}: {}", model, field.name, field.kind)
            }
            Operation::AddForeignKey { model, field } => format!(
                "为 {} 添加外键 {} -> {}（on_delete={}）",
                model, field.name, field.to, field.on_delete
            ),
        }
    }
}

/// ORM 约定的表名：`{app}_{模型名小写}`
pub fn table_name(app: &str, model: &str) -> String {
    format!("{}_{}", app, model.to_lowercase())
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub null: bool,
    pub blank: bool,
    pub default: DefaultValue,
}

impl Field {
    const fn of(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            null: false,
            blank: false,
            default: DefaultValue::None,
        }
    }

    pub const fn auto(name: &'static str) -> Self {
        Self::of(name, FieldKind::AutoPk)
    }

    pub const fn char(name: &'static str, max_length: u32) -> Self {
        Self::of(name, FieldKind::Char { max_length })
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::of(name, FieldKind::Integer)
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self::of(name, FieldKind::Boolean)
    }

    pub const fn float(name: &'static str) -> Self {
        Self::of(name, FieldKind::Float)
    }

    pub const fn datetime(name: &'static str) -> Self {
        Self::of(name, FieldKind::DateTime)
    }

    pub const fn status(
        name: &'static str,
        max_length: u32,
        choices: &'static [Choice],
        no_check_for_status: bool,
    ) -> Self {
        Self::of(
            name,
            FieldKind::Status {
                max_length,
                choices,
                no_check_for_status,
            },
        )
    }

    pub const fn null(self) -> Self {
        Self { null: true, ..self }
    }

    pub const fn blank(self) -> Self {
        Self { blank: true, ..self }
    }

    pub const fn default(self, default: DefaultValue) -> Self {
        Self { default, ..self }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    AutoPk,
    Char {
        max_length: u32,
    },
    Integer,
    Boolean,
    Float,
    DateTime,
    /// 带固定可选值的状态字段，落库为定长字符串
    Status {
        max_length: u32,
        choices: &'static [Choice],
        no_check_for_status: bool,
    },
}

impl FieldKind {
    pub fn max_length(&self) -> Option<u32> {
        match self {
            FieldKind::Char { max_length } | FieldKind::Status { max_length, .. } => Some(*max_length),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::AutoPk => write!(f, "auto"),
            FieldKind::Char { max_length } => write!(f, "char({})", max_length),
            FieldKind::Integer => write!(f, "integer"),
            FieldKind::Boolean => write!(f, "boolean"),
            FieldKind::Float => write!(f, "float"),
            FieldKind::DateTime => write!(f, "datetime"),
            FieldKind::Status { max_length, choices, .. } => {
                write!(f, "status({}, {})", max_length, format_choices(choices))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Choice {
    pub value: ChoiceValue,
    pub label: &'static str,
}

impl Choice {
    pub const fn int(value: i64, label: &'static str) -> Self {
        Self {
            value: ChoiceValue::Int(value),
            label,
        }
    }

    pub const fn text(value: &'static str, label: &'static str) -> Self {
        Self {
            value: ChoiceValue::Text(value),
            label,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    Int(i64),
    Text(&'static str),
}

impl fmt::Display for ChoiceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceValue::Int(v) => write!(f, "{}", v),
            ChoiceValue::Text(v) => write!(f, "'{}'", v),
        }
    }
}

pub fn format_choices(choices: &[Choice]) -> String {
    let items: Vec<String> = choices
        .iter()
        .map(|c| format!("({}, '{}')", c.value, c.label))
        .collect();
    format!("[{}]", items.join(", "))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DefaultValue {
    /// 未声明默认值
    None,
    Null,
    Text(&'static str),
    Int(i64),
    Bool(bool),
    CurrentTimestamp,
}

impl DefaultValue {
    /// 默认值是否等于某个可选值；未声明默认值时视为匹配
    pub fn matches(&self, value: &ChoiceValue) -> bool {
        match (self, value) {
            (DefaultValue::None, _) => true,
            (DefaultValue::Text(a), ChoiceValue::Text(b)) => a == b,
            (DefaultValue::Int(a), ChoiceValue::Int(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::None => write!(f, "<none>"),
            DefaultValue::Null => write!(f, "NULL"),
            DefaultValue::Text(v) => write!(f, "'{}'", v),
            DefaultValue::Int(v) => write!(f, "{}", v),
            DefaultValue::Bool(v) => write!(f, "{}", v),
            DefaultValue::CurrentTimestamp => write!(f, "CURRENT_TIMESTAMP"),
        }
    }
}

/// 外键引用的模型，形如 `archive.Take`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelRef {
    pub app: &'static str,
    pub model: &'static str,
}

impl ModelRef {
    pub const fn new(app: &'static str, model: &'static str) -> Self {
        Self { app, model }
    }

    pub fn table(&self) -> String {
        table_name(self.app, self.model)
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.app, self.model)
    }
}

/// 被引用记录删除时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OnDelete {
    Cascade,
    SetNull,
}

impl OnDelete {
    pub fn sql(&self) -> &'static str {
        match self {
            OnDelete::Cascade => "CASCADE",
            OnDelete::SetNull => "SET NULL",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ForeignKey {
    pub name: &'static str,
    pub to: ModelRef,
    pub on_delete: OnDelete,
    pub null: bool,
    pub blank: bool,
    /// 反向访问名
    pub related_name: Option<&'static str>,
}

impl ForeignKey {
    pub const fn new(name: &'static str, to: ModelRef, on_delete: OnDelete) -> Self {
        Self {
            name,
            to,
            on_delete,
            null: false,
            blank: false,
            related_name: None,
        }
    }

    pub const fn null(self) -> Self {
        Self { null: true, ..self }
    }

    pub const fn blank(self) -> Self {
        Self { blank: true, ..self }
    }

    pub const fn related_name(self, related_name: &'static str) -> Self {
        Self {
            related_name: Some(related_name),
            ..self
        }
    }

    /// 外键列名：`{字段名}_id`
    pub fn column(&self) -> String {
        format!("{}_id", self.name)
    }

    /// 约束名，仅在支持独立外键约束的后端使用
    pub fn constraint_name(&self, table: &str) -> String {
        format!("fk_{}_{}", table, self.column())
    }
}
