//! 迁移依赖图：校验依赖关系并给出确定的执行顺序

use std::collections::{BTreeSet, HashMap};

use super::validate::SchemaError;
use super::{Migration, MigrationKey};

fn index_records(records: &[&Migration]) -> Result<HashMap<MigrationKey, usize>, SchemaError> {
    let mut index = HashMap::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        if index.insert(record.key(), i).is_some() {
            return Err(SchemaError::DuplicateMigration {
                migration: record.label(),
            });
        }
    }
    Ok(index)
}

/// 按依赖关系进行拓扑排序
///
/// 同时就绪的迁移按声明顺序输出，保证结果稳定。
pub fn plan<'a>(records: &[&'a Migration]) -> Result<Vec<&'a Migration>, SchemaError> {
    let index = index_records(records)?;

    let mut in_degree = vec![0usize; records.len()];
    let mut dependants: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    for (i, record) in records.iter().enumerate() {
        for dependency in record.dependencies {
            let Some(&j) = index.get(dependency) else {
                return Err(SchemaError::UnknownDependency {
                    migration: record.label(),
                    dependency: dependency.to_string(),
                });
            };
            in_degree[i] += 1;
            dependants[j].push(i);
        }
    }

    let mut ready: BTreeSet<usize> = (0..records.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut ordered = Vec::with_capacity(records.len());
    while let Some(i) = ready.pop_first() {
        ordered.push(records[i]);
        for &k in &dependants[i] {
            in_degree[k] -= 1;
            if in_degree[k] == 0 {
                ready.insert(k);
            }
        }
    }

    if ordered.len() < records.len() {
        let members = records
            .iter()
            .zip(in_degree.iter())
            .filter(|(_, &degree)| degree > 0)
            .map(|(record, _)| record.label())
            .collect();
        return Err(SchemaError::Cycle { members });
    }
    Ok(ordered)
}

/// 检查给定顺序中每条迁移的依赖都排在它之前
pub fn check_order(records: &[&Migration]) -> Result<(), SchemaError> {
    let index = index_records(records)?;
    for (i, record) in records.iter().enumerate() {
        for dependency in record.dependencies {
            match index.get(dependency) {
                None => {
                    return Err(SchemaError::UnknownDependency {
                        migration: record.label(),
                        dependency: dependency.to_string(),
                    })
                }
                Some(&j) if j >= i => {
                    return Err(SchemaError::ForwardReference {
                        migration: record.label(),
                        dependency: dependency.to_string(),
                    })
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}
