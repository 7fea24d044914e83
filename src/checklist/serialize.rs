//! Build the step document the workflow update endpoint expects.
//!
//! Wire conventions:
//! - empty optional text is sent as a single space (`" "`), never as `""`
//! - `inspected` is the string `"false"`
//! - custom column values go in a per-task `customInput` bucket keyed by
//!   column name, each holding `{ type, value, options }`
//! - custom cells become `snake_case_tag: { input: true, inputText }` on
//!   every entity object of the task

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::{json, Map, Value};

use super::model::ChecklistModel;
use super::types::{CellType, CellValue, ChecklistKind, CustomCell, EntityTaxonomy, TaskRow};

pub const PLACEHOLDER: &str = " ";

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// `{ "<stepKey>": { actors, tasks, name, stepOrder, entities? } }`
pub fn serialize(
    model: &ChecklistModel,
    taxonomy: &EntityTaxonomy,
    kind: ChecklistKind,
    now: DateTime<Utc>,
) -> Value {
    let mut payload = Map::new();
    payload.insert(
        kind.step_key().to_string(),
        serialize_step(model, taxonomy, kind, now),
    );
    Value::Object(payload)
}

pub fn serialize_step(
    model: &ChecklistModel,
    taxonomy: &EntityTaxonomy,
    kind: ChecklistKind,
    now: DateTime<Utc>,
) -> Value {
    let emitted = model.emitted_actor_keys();
    let date = http_date(now);

    let mut actors = Map::new();
    for (id, key) in &emitted {
        let Some(actor) = model.actor(*id) else {
            continue;
        };
        actors.insert(
            key.clone(),
            json!({
                "action": or_placeholder(&actor.actions),
                "date": date,
                "designation": or_placeholder(&actor.designation),
                "inspected": "false",
                "name": or_placeholder(&actor.main_actor),
                "team": or_placeholder(&actor.team),
            }),
        );
    }

    let mut tasks = Map::new();
    for (index, task) in model.tasks.iter().enumerate() {
        let mut actions = Map::new();
        let action = task.action_actor.and_then(|actor_id| {
            let (_, key) = emitted.iter().find(|(id, _)| *id == actor_id)?;
            let actor = model.actor(actor_id)?;
            Some((key, actor))
        });
        if let Some((key, actor)) = action {
            actions.insert(
                "action1".to_string(),
                json!({
                    "actionType": actor.actions,
                    "actor": key,
                    "isSigned": false,
                }),
            );
        }

        tasks.insert(
            format!("task{}", index + 1),
            json!({
                "actions": actions,
                "customInput": custom_input(model, task),
                "entityObjects": entity_objects(task, taxonomy),
                "remark": {
                    "input": task.remark,
                    "remarkText": PLACEHOLDER,
                    "showRemark": task.remark,
                },
                "route": or_placeholder(&task.route),
                "taskLabel": or_placeholder(&task.task_name),
            }),
        );
    }

    let mut step = Map::new();
    step.insert("actors".to_string(), Value::Object(actors));
    step.insert("tasks".to_string(), Value::Object(tasks));
    step.insert("name".to_string(), json!(kind.checklist_name()));
    step.insert("stepOrder".to_string(), json!(kind.step_order()));
    if !taxonomy.is_empty() {
        step.insert("entities".to_string(), taxonomy.to_json());
    }
    Value::Object(step)
}

/// RFC 1123 date in GMT, e.g. `Tue, 15 Oct 2024 08:30:00 GMT`.
pub fn http_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// `Serial No` -> `serial_no`
pub fn custom_cell_key(tag: &str) -> String {
    WHITESPACE_RE.replace_all(&tag.trim().to_lowercase(), "_").into_owned()
}

fn or_placeholder(value: &str) -> &str {
    if value.trim().is_empty() {
        PLACEHOLDER
    } else {
        value
    }
}

/// Selected objects per type. A type with no explicit objects expands to
/// every object the taxonomy lists for it.
fn entity_objects(task: &TaskRow, taxonomy: &EntityTaxonomy) -> Value {
    let mut objects = Map::new();
    let custom = custom_cell_fields(&task.custom_cells);

    let known_types: Vec<&str> = task
        .entity_types
        .iter()
        .map(|t| t.trim())
        .filter(|t| {
            let known = taxonomy.get(t).is_some();
            if !known {
                tracing::warn!("Entity type \"{}\" not found in entity data", t);
            }
            known
        })
        .collect();

    let mut insert = |key: &str, entity_type: &str| {
        let mut entry = Map::new();
        entry.insert("entityType".to_string(), json!(entity_type));
        for (field, value) in &custom {
            entry.insert(field.clone(), value.clone());
        }
        objects.insert(key.to_string(), Value::Object(entry));
    };

    for entity_type in &known_types {
        let explicit: Vec<&String> = task
            .entity_objects
            .iter()
            .filter(|o| taxonomy.contains_object(entity_type, o))
            .collect();

        if task.entity_objects.is_empty() {
            if let Some(entry) = taxonomy.get(entity_type) {
                for object in &entry.objects {
                    insert(&object.key, entity_type);
                }
            }
        } else {
            for object in explicit {
                insert(object.trim(), entity_type);
            }
        }
    }

    // Explicit objects the taxonomy does not list under any selected type
    // are kept and tagged with the first selected type.
    if let Some(first) = known_types.first() {
        for object in &task.entity_objects {
            let object = object.trim();
            let listed = known_types
                .iter()
                .any(|t| taxonomy.contains_object(t, object));
            if !listed {
                insert(object, first);
            }
        }
    }

    Value::Object(objects)
}

fn custom_cell_fields(cells: &[CustomCell]) -> Vec<(String, Value)> {
    cells
        .iter()
        .map(|cell| {
            let text = cell
                .value
                .as_ref()
                .map(|v| v.display())
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| PLACEHOLDER.to_string());
            (
                custom_cell_key(&cell.tag),
                json!({ "input": true, "inputText": text }),
            )
        })
        .collect()
}

fn custom_input(model: &ChecklistModel, task: &TaskRow) -> Value {
    let mut bucket = Map::new();
    for column in model.custom_columns() {
        let cell_type = model.effective_cell_type(task, column);
        let value = model
            .cell_value(task, column)
            .map(|v| cell_value_json(&v))
            .unwrap_or_else(|| json!(PLACEHOLDER));
        bucket.insert(
            column.name.clone(),
            json!({
                "type": cell_type.as_str(),
                "value": value,
                "options": model.effective_options(task, column),
            }),
        );
    }
    Value::Object(bucket)
}

pub(crate) fn cell_value_json(value: &CellValue) -> Value {
    match value {
        CellValue::Text(s) | CellValue::Select(s) => json!(or_placeholder(s)),
        CellValue::Number(Some(n)) => serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or_else(|| json!(PLACEHOLDER)),
        CellValue::Number(None) => json!(PLACEHOLDER),
        CellValue::Checkbox(b) => json!(b),
        CellValue::MultiSelect(items) => json!(items),
    }
}

pub(crate) fn cell_value_from_json(cell_type: CellType, value: &Value) -> Option<CellValue> {
    let text = || {
        value
            .as_str()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_default()
            .to_string()
    };
    match cell_type {
        CellType::Text => Some(CellValue::Text(text())),
        CellType::Select => Some(CellValue::Select(text())),
        CellType::Number => Some(CellValue::Number(
            value
                .as_f64()
                .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
                .filter(|n: &f64| n.is_finite()),
        )),
        CellType::Checkbox => Some(CellValue::Checkbox(
            value.as_bool().unwrap_or(value.as_str() == Some("true")),
        )),
        CellType::MultiSelect => Some(CellValue::MultiSelect(
            value
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|i| i.as_str())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        )),
        CellType::Blank => None,
    }
}
