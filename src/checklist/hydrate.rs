use std::collections::HashMap;

use serde_json::Value;
use uuid::Uuid;

use super::model::{CellKey, ChecklistModel};
use super::serialize::cell_value_from_json;
use super::types::{
    is_reserved_column, ActorRow, CellConfig, CellType, Column, EntityTaxonomy, TaskRow,
};

/// Editable state recovered from a saved step document.
#[derive(Debug, Clone, PartialEq)]
pub struct Hydrated {
    pub model: ChecklistModel,
    pub taxonomy: EntityTaxonomy,
}

/// Rebuild rows from a step document (`{ actors, tasks, entities? }`).
///
/// Never fails. Missing or malformed fields fall back to empty values and
/// single-space placeholders read back as empty strings. Only the first
/// action of a task survives, and custom cells are not recovered.
pub fn hydrate(step: &Value) -> Hydrated {
    let mut actors = Vec::new();
    let mut actor_keys: HashMap<String, Uuid> = HashMap::new();

    if let Some(entries) = step.get("actors").and_then(Value::as_object) {
        for (key, actor) in entries {
            let mut row = ActorRow {
                actions: text(actor, "action"),
                main_actor: text(actor, "name"),
                team: text(actor, "team"),
                designation: text(actor, "designation"),
                person: text(actor, "person"),
                ..ActorRow::new()
            };
            row.clear_if_realtime();
            actor_keys.insert(key.clone(), row.id);
            actors.push(row);
        }
    }

    let mut columns = Column::default_columns();
    let mut cell_values = HashMap::new();
    let mut tasks = Vec::new();

    if let Some(entries) = step.get("tasks").and_then(Value::as_object) {
        for (index, task) in entries.values().enumerate() {
            let mut row = TaskRow::new(index);
            row.task_name = text(task, "taskLabel");
            row.remark = task
                .pointer("/remark/input")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            row.route = text(task, "route");
            row.action_actor = first_action_actor(task, &actors, &actor_keys);

            if let Some(objects) = task.get("entityObjects").and_then(Value::as_object) {
                for (object_key, object) in objects {
                    let entity_type = text(object, "entityType");
                    if !entity_type.is_empty() && !row.entity_types.contains(&entity_type) {
                        row.entity_types.push(entity_type);
                    }
                    let object_key = object_key.trim().to_string();
                    if !object_key.is_empty() && !row.entity_objects.contains(&object_key) {
                        row.entity_objects.push(object_key);
                    }
                }
            }

            if let Some(bucket) = task.get("customInput").and_then(Value::as_object) {
                for (name, entry) in bucket {
                    let name = name.trim();
                    if name.is_empty() || is_reserved_column(name) {
                        continue;
                    }
                    if !columns.iter().any(|c| c.name == name) {
                        columns.push(Column::custom(name, None, Vec::new()));
                    }

                    let cell_type: CellType = entry
                        .get("type")
                        .and_then(Value::as_str)
                        .and_then(|t| t.parse().ok())
                        .unwrap_or_default();
                    let options = entry
                        .get("options")
                        .and_then(Value::as_array)
                        .map(|items| {
                            items
                                .iter()
                                .filter_map(Value::as_str)
                                .map(str::to_string)
                                .collect()
                        })
                        .unwrap_or_default();
                    row.cell_configs.insert(
                        name.to_string(),
                        CellConfig::with_options(cell_type, options),
                    );
                    let value = entry.get("value").unwrap_or(&Value::Null);
                    if let Some(value) = cell_value_from_json(cell_type, value) {
                        cell_values.insert(CellKey::new(row.id, name), value);
                    }
                }
            }

            tasks.push(row);
        }
    }

    let taxonomy = step
        .get("entities")
        .map(EntityTaxonomy::from_json)
        .unwrap_or_default();

    Hydrated {
        model: ChecklistModel::from_parts(actors, tasks, columns, cell_values),
        taxonomy,
    }
}

/// Actor row for the task's first action: by `actor` key, then by action label.
fn first_action_actor(
    task: &Value,
    actors: &[ActorRow],
    actor_keys: &HashMap<String, Uuid>,
) -> Option<Uuid> {
    let action = task
        .get("actions")
        .and_then(Value::as_object)
        .and_then(|actions| actions.values().next())?;

    if let Some(id) = action
        .get("actor")
        .and_then(Value::as_str)
        .and_then(|key| actor_keys.get(key.trim()))
    {
        return Some(*id);
    }

    let action_type = text(action, "actionType");
    if action_type.is_empty() {
        return None;
    }
    actors
        .iter()
        .find(|a| a.actions == action_type)
        .map(|a| a.id)
}

fn text(value: &Value, key: &str) -> String {
    match value.get(key).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::model::{ActorField, Edit};
    use crate::checklist::serialize::serialize_step;
    use crate::checklist::types::{CellValue, ChecklistKind};
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_hydrate_saved_step() {
        let step = json!({
            "actors": {
                "actor2": { "action": "Sign", "name": "Bob", "team": "Ops", "designation": " " },
                "actor1": { "action": "Inspect", "name": "Jane", "team": "QA", "designation": "Manager" }
            },
            "tasks": {
                "task1": {
                    "taskLabel": "Check valve",
                    "remark": { "input": true, "remarkText": " ", "showRemark": true },
                    "route": "/image",
                    "actions": { "action1": { "actionType": "Inspect", "actor": "actor1", "isSigned": false } },
                    "entityObjects": {
                        "m1": { "entityType": "machine" },
                        "m2": { "entityType": "machine" }
                    }
                },
                "task2": { "taskLabel": " ", "route": " " }
            },
            "entities": { "machine": { "m1": { "name": "Machine 1" } } }
        });

        let Hydrated { model, taxonomy } = hydrate(&step);

        assert_eq!(model.actors.len(), 2);
        assert_eq!(model.actors[0].main_actor, "Bob");
        assert_eq!(model.actors[0].designation, "");
        assert_eq!(model.actors[1].actions, "Inspect");

        assert_eq!(model.tasks.len(), 2);
        let task = &model.tasks[0];
        assert_eq!(task.task_number, "01.");
        assert_eq!(task.task_name, "Check valve");
        assert!(task.remark);
        assert_eq!(task.entity_types, vec!["machine".to_string()]);
        assert_eq!(task.entity_objects, vec!["m1".to_string(), "m2".to_string()]);
        assert_eq!(task.action_actor, Some(model.actors[1].id));

        assert_eq!(model.tasks[1].task_name, "");
        assert_eq!(model.tasks[1].route, "");
        assert_eq!(model.tasks[1].action_actor, None);

        assert!(taxonomy.contains_object("machine", "m1"));
    }

    #[test]
    fn test_action_falls_back_to_label_match() {
        let step = json!({
            "actors": { "a": { "action": "Inspect", "name": "Jane" } },
            "tasks": { "t": { "actions": { "x": { "actionType": "Inspect", "actor": "gone" } } } }
        });
        let model = hydrate(&step).model;
        assert_eq!(model.tasks[0].action_actor, Some(model.actors[0].id));
    }

    #[test]
    fn test_saved_realtime_actor_drops_team() {
        let step = json!({
            "actors": {
                "actor1": { "action": "Sign", "name": "realtime", "team": "QA", "designation": "Manager" }
            }
        });
        let model = hydrate(&step).model;
        let actor = &model.actors[0];
        assert!(actor.is_realtime());
        assert_eq!(actor.team, "");
        assert_eq!(actor.designation, "");

        let step = serialize_step(
            &model,
            &EntityTaxonomy::default(),
            ChecklistKind::Meq,
            Utc::now(),
        );
        assert_eq!(step["actors"]["actor1"]["team"], " ");
        assert_eq!(step["actors"]["actor1"]["designation"], " ");
    }

    #[test]
    fn test_hydrate_tolerates_garbage() {
        for doc in [
            json!(null),
            json!("step"),
            json!({ "actors": 5, "tasks": [1, 2] }),
            json!({ "tasks": { "task1": { "remark": "yes", "entityObjects": [] } } }),
        ] {
            let hydrated = hydrate(&doc);
            assert!(hydrated.model.actors.is_empty());
            assert!(hydrated.taxonomy.is_empty());
        }
        let partial = hydrate(&json!({ "tasks": { "task1": { "remark": "yes" } } }));
        assert_eq!(partial.model.tasks.len(), 1);
        assert!(!partial.model.tasks[0].remark);
    }

    #[test]
    fn test_actor_fields_round_trip() {
        let mut model = ChecklistModel::new();
        model.apply(Edit::AddActor).unwrap();
        let rows: Vec<_> = model.actors.iter().map(|a| a.id).collect();
        let values = [
            ("Inspect", "Jane", "QA", "Manager"),
            ("Approve", "realtime", "", ""),
        ];
        for (row, (action, name, team, designation)) in rows.iter().zip(values) {
            let edits = [
                (ActorField::Actions, action),
                (ActorField::MainActor, name),
                (ActorField::Team, team),
                (ActorField::Designation, designation),
            ];
            for (field, value) in edits {
                if value.is_empty() {
                    continue;
                }
                model
                    .apply(Edit::SetActorField {
                        row: *row,
                        field,
                        value: value.to_string(),
                    })
                    .unwrap();
            }
        }

        let step = serialize_step(
            &model,
            &EntityTaxonomy::default(),
            ChecklistKind::Meq,
            Utc::now(),
        );
        let back = hydrate(&step).model;
        let fields = |m: &ChecklistModel| {
            m.actors
                .iter()
                .map(|a| {
                    (
                        a.actions.clone(),
                        a.main_actor.clone(),
                        a.team.clone(),
                        a.designation.clone(),
                    )
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(fields(&back), fields(&model));
    }

    #[test]
    fn test_select_all_becomes_explicit_after_round_trip() {
        let mut model = ChecklistModel::new();
        let task = model.tasks[0].id;
        model
            .apply(Edit::SetEntityTypes {
                row: task,
                types: vec!["machine".into()],
            })
            .unwrap();
        let taxonomy = EntityTaxonomy::from_json(&json!({
            "machine": { "m1": { "name": "Machine 1" }, "m2": { "name": "Machine 2" } }
        }));

        let now = Utc::now();
        let first = serialize_step(&model, &taxonomy, ChecklistKind::Meq, now);
        let hydrated = hydrate(&first);
        assert_eq!(
            hydrated.model.tasks[0].entity_objects,
            vec!["m1".to_string(), "m2".to_string()]
        );

        let second = serialize_step(&hydrated.model, &hydrated.taxonomy, ChecklistKind::Meq, now);
        assert_eq!(first["tasks"], second["tasks"]);
        assert_eq!(hydrate(&second).model.tasks[0].entity_objects, hydrated.model.tasks[0].entity_objects);
    }

    #[test]
    fn test_custom_input_restores_columns() {
        let step = json!({
            "tasks": {
                "task1": {
                    "customInput": {
                        "Pressure": { "type": "number", "value": 4.5, "options": [] },
                        "Grade": { "type": "multi-select", "value": ["A", "B"], "options": ["A", "B", "C"] },
                        "Route": { "type": "text", "value": "ignored" },
                        "Custom Cells": { "type": "text", "value": "ignored" }
                    }
                }
            }
        });
        let model = hydrate(&step).model;
        let names: Vec<_> = model.custom_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Pressure", "Grade"]);

        let task = &model.tasks[0];
        let pressure = model.column("Pressure").unwrap();
        assert_eq!(model.effective_cell_type(task, pressure), CellType::Number);
        assert_eq!(
            model.cell_value(task, pressure),
            Some(CellValue::Number(Some(4.5)))
        );
        let grade = model.column("Grade").unwrap();
        assert_eq!(model.effective_options(task, grade).len(), 3);
        assert_eq!(
            model.cell_value(task, grade),
            Some(CellValue::MultiSelect(vec!["A".into(), "B".into()]))
        );
    }
}
