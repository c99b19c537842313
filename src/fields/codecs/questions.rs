//! QuestionList: a map of question id to answer, each question with its own
//! input type

use crate::answers::{FieldValue, QuantityChoice};
use crate::blueprint::{Component, ComponentKind, ComponentType, Question, QuestionInputType};
use crate::fields::codec::{
    check_text_rules, stored_map_or, Advisory, AdvisoryKind, FieldCodec, FieldEdit, FieldError,
};
use std::collections::BTreeMap;

pub struct QuestionListCodec;

fn questions(component: &Component) -> &[Question] {
    match &component.kind {
        ComponentKind::QuestionList(spec) => &spec.questions,
        _ => &[],
    }
}

fn find_question<'a>(component: &'a Component, question_id: &str) -> Option<&'a Question> {
    questions(component).iter().find(|q| q.id == question_id)
}

/// Default answer for one question
pub(crate) fn default_answer(question: &Question) -> FieldValue {
    match question.input_type {
        QuestionInputType::Text | QuestionInputType::Textarea | QuestionInputType::Radio => {
            FieldValue::Text(String::new())
        }
        QuestionInputType::CheckboxSet => FieldValue::Choices(Vec::new()),
        QuestionInputType::CheckboxSetWithQuantity => FieldValue::Quantities(
            question
                .options
                .iter()
                .map(|label| QuantityChoice {
                    label: label.clone(),
                    checked: false,
                    number: None,
                })
                .collect(),
        ),
    }
}

/// Coerce a stored answer to the question's input type
pub(crate) fn normalize_answer(question: &Question, stored: Option<&FieldValue>) -> FieldValue {
    let Some(stored) = stored else {
        return default_answer(question);
    };
    match (question.input_type, stored) {
        (
            QuestionInputType::Text | QuestionInputType::Textarea | QuestionInputType::Radio,
            FieldValue::Text(_),
        ) => stored.clone(),
        (
            QuestionInputType::Text | QuestionInputType::Textarea | QuestionInputType::Radio,
            FieldValue::Number(n),
        ) => FieldValue::Text(n.to_string()),
        (QuestionInputType::CheckboxSet, FieldValue::Choices(_)) => stored.clone(),
        (QuestionInputType::CheckboxSet, FieldValue::Quantities(items)) => FieldValue::Choices(
            items
                .iter()
                .filter(|q| q.checked)
                .map(|q| q.label.clone())
                .collect(),
        ),
        (QuestionInputType::CheckboxSetWithQuantity, FieldValue::Quantities(_)) => stored.clone(),
        (QuestionInputType::CheckboxSetWithQuantity, FieldValue::Choices(labels)) => {
            let mut items = match default_answer(question) {
                FieldValue::Quantities(items) => items,
                _ => Vec::new(),
            };
            for label in labels {
                match items.iter_mut().find(|q| &q.label == label) {
                    Some(item) => item.checked = true,
                    None => items.push(QuantityChoice {
                        label: label.clone(),
                        checked: true,
                        number: None,
                    }),
                }
            }
            FieldValue::Quantities(items)
        }
        _ => default_answer(question),
    }
}

/// Add the option if absent, remove it if present; order of the rest is kept
pub(crate) fn toggle_choice(choices: &mut Vec<String>, option: &str) {
    match choices.iter().position(|c| c == option) {
        Some(index) => {
            choices.remove(index);
        }
        None => choices.push(option.to_string()),
    }
}

fn answer_map(current: FieldValue) -> BTreeMap<String, FieldValue> {
    match current {
        FieldValue::Map(map) => map,
        _ => BTreeMap::new(),
    }
}

impl FieldCodec for QuestionListCodec {
    fn component_type(&self) -> ComponentType {
        ComponentType::QuestionList
    }

    fn default_value(&self, component: &Component) -> Option<FieldValue> {
        Some(FieldValue::Map(
            questions(component)
                .iter()
                .map(|q| (q.id.clone(), default_answer(q)))
                .collect(),
        ))
    }

    fn normalize(&self, component: &Component, stored: Option<&FieldValue>) -> Option<FieldValue> {
        let stored_map = stored.and_then(|v| v.as_map());
        // Unknown question ids are kept for forward compatibility
        let mut answers = stored_map.cloned().unwrap_or_default();
        for question in questions(component) {
            let answer = normalize_answer(question, stored_map.and_then(|m| m.get(&question.id)));
            answers.insert(question.id.clone(), answer);
        }
        Some(FieldValue::Map(answers))
    }

    fn edit_base(&self, component: &Component, stored: Option<&FieldValue>) -> Option<FieldValue> {
        stored_map_or(self, component, stored)
    }

    fn merge(
        &self,
        component: &Component,
        current: FieldValue,
        edit: FieldEdit,
    ) -> Result<FieldValue, FieldError> {
        match edit {
            FieldEdit::Replace { value } => Ok(value),
            FieldEdit::Clear => Ok(self.default_value(component).unwrap_or_default()),
            FieldEdit::SetAnswer {
                question_id,
                answer,
            } => {
                let mut answers = answer_map(current);
                answers.insert(question_id, answer);
                Ok(FieldValue::Map(answers))
            }
            FieldEdit::ToggleOption {
                question_id,
                option,
            } => {
                let question = find_question(component, &question_id)
                    .ok_or_else(|| FieldError::UnknownQuestion(question_id.clone()))?;
                let mut answers = answer_map(current);
                let answer = normalize_answer(question, answers.get(&question_id));
                let toggled = match answer {
                    FieldValue::Choices(mut choices) => {
                        toggle_choice(&mut choices, &option);
                        FieldValue::Choices(choices)
                    }
                    FieldValue::Quantities(mut items) => {
                        match items.iter_mut().find(|q| q.label == option) {
                            Some(item) => item.checked = !item.checked,
                            None => items.push(QuantityChoice {
                                label: option,
                                checked: true,
                                number: None,
                            }),
                        }
                        FieldValue::Quantities(items)
                    }
                    // Radio questions hold a single choice
                    FieldValue::Text(current_choice) if question.input_type == QuestionInputType::Radio => {
                        if current_choice == option {
                            FieldValue::Text(String::new())
                        } else {
                            FieldValue::Text(option)
                        }
                    }
                    _ => {
                        return Err(FieldError::UnsupportedEdit {
                            component_type: self.component_type(),
                            edit: "toggle_option",
                        })
                    }
                };
                answers.insert(question_id, toggled);
                Ok(FieldValue::Map(answers))
            }
            FieldEdit::SetQuantity {
                question_id,
                option,
                number,
            } => {
                let question = find_question(component, &question_id)
                    .ok_or_else(|| FieldError::UnknownQuestion(question_id.clone()))?;
                if question.input_type != QuestionInputType::CheckboxSetWithQuantity {
                    return Err(FieldError::UnsupportedEdit {
                        component_type: self.component_type(),
                        edit: "set_quantity",
                    });
                }
                let mut answers = answer_map(current);
                let mut items = match normalize_answer(question, answers.get(&question_id)) {
                    FieldValue::Quantities(items) => items,
                    _ => Vec::new(),
                };
                match items.iter_mut().find(|q| q.label == option) {
                    Some(item) => item.number = number,
                    None => items.push(QuantityChoice {
                        label: option,
                        checked: number.is_some(),
                        number,
                    }),
                }
                answers.insert(question_id, FieldValue::Quantities(items));
                Ok(FieldValue::Map(answers))
            }
            other => Err(FieldError::unsupported(self.component_type(), &other)),
        }
    }

    fn validate(&self, component: &Component, value: &FieldValue) -> Vec<Advisory> {
        let mut advisories = Vec::new();
        let answers = value.as_map();

        for question in questions(component) {
            let answer = normalize_answer(question, answers.and_then(|m| m.get(&question.id)));

            if (question.required || component.required) && answer.is_blank() {
                advisories.push(
                    Advisory::new(&component.id, AdvisoryKind::Required, "This question is required")
                        .at(question.id.clone()),
                );
            }

            match &answer {
                FieldValue::Text(text) => {
                    if question.input_type == QuestionInputType::Radio
                        && !text.is_empty()
                        && !question.options.is_empty()
                        && !question.options.contains(text)
                    {
                        advisories.push(
                            Advisory::new(
                                &component.id,
                                AdvisoryKind::UnknownOption,
                                format!("'{}' is not one of the listed options", text),
                            )
                            .at(question.id.clone()),
                        );
                    }
                    advisories.extend(check_text_rules(
                        &component.id,
                        Some(&question.id),
                        text,
                        component.validation.as_ref(),
                    ));
                }
                FieldValue::Choices(choices) if !question.options.is_empty() => {
                    for choice in choices.iter().filter(|c| !question.options.contains(c)) {
                        advisories.push(
                            Advisory::new(
                                &component.id,
                                AdvisoryKind::UnknownOption,
                                format!("'{}' is not one of the listed options", choice),
                            )
                            .at(question.id.clone()),
                        );
                    }
                }
                _ => {}
            }
        }
        advisories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::QuestionListSpec;

    fn component() -> Component {
        Component::new(
            "current_process",
            ComponentKind::QuestionList(QuestionListSpec {
                questions: vec![
                    Question::new("cp_01", "Current tool", QuestionInputType::Text),
                    Question::new("cp_02", "Deployment", QuestionInputType::Radio)
                        .with_options(["Cloud", "On-premise"]),
                    Question::new("cp_04", "Modules in use", QuestionInputType::CheckboxSet)
                        .with_options(["User Management", "Reporting & Analytics", "Billing"]),
                    Question::new("cp_05", "Seats per module", QuestionInputType::CheckboxSetWithQuantity)
                        .with_options(["Sales", "Support"]),
                ],
            }),
        )
    }

    fn toggle(value: FieldValue, option: &str) -> FieldValue {
        QuestionListCodec
            .merge(
                &component(),
                value,
                FieldEdit::ToggleOption {
                    question_id: "cp_04".to_string(),
                    option: option.to_string(),
                },
            )
            .unwrap()
    }

    fn choices(value: &FieldValue) -> Vec<String> {
        match &value.as_map().unwrap()["cp_04"] {
            FieldValue::Choices(c) => c.clone(),
            other => panic!("unexpected answer {:?}", other),
        }
    }

    #[test]
    fn test_checkbox_toggle_adds_and_removes() {
        let start = QuestionListCodec.normalize(&component(), None).unwrap();
        let one = toggle(start, "User Management");
        let two = toggle(one, "Reporting & Analytics");
        assert_eq!(choices(&two), vec!["User Management", "Reporting & Analytics"]);

        let three = toggle(two, "User Management");
        assert_eq!(choices(&three), vec!["Reporting & Analytics"]);
    }

    #[test]
    fn test_set_answer_leaves_other_questions() {
        let codec = QuestionListCodec;
        let c = component();
        let start = toggle(codec.normalize(&c, None).unwrap(), "Billing");
        let updated = codec
            .merge(
                &c,
                start.clone(),
                FieldEdit::SetAnswer {
                    question_id: "cp_01".to_string(),
                    answer: FieldValue::Text("Spreadsheets".to_string()),
                },
            )
            .unwrap();

        let before = start.as_map().unwrap();
        let after = updated.as_map().unwrap();
        assert_eq!(after["cp_04"], before["cp_04"]);
        assert_eq!(after["cp_02"], before["cp_02"]);
    }

    #[test]
    fn test_quantity_options() {
        let codec = QuestionListCodec;
        let c = component();
        let start = codec.normalize(&c, None).unwrap();
        let value = codec
            .merge(
                &c,
                start,
                FieldEdit::SetQuantity {
                    question_id: "cp_05".to_string(),
                    option: "Sales".to_string(),
                    number: Some(25.0),
                },
            )
            .unwrap();
        let value = codec
            .merge(
                &c,
                value,
                FieldEdit::ToggleOption {
                    question_id: "cp_05".to_string(),
                    option: "Sales".to_string(),
                },
            )
            .unwrap();

        match &value.as_map().unwrap()["cp_05"] {
            FieldValue::Quantities(items) => {
                assert_eq!(items.len(), 2);
                assert!(items[0].checked);
                assert_eq!(items[0].number, Some(25.0));
                assert!(!items[1].checked);
            }
            other => panic!("unexpected answer {:?}", other),
        }
    }

    #[test]
    fn test_radio_toggle_and_unknown_option_advisory() {
        let codec = QuestionListCodec;
        let c = component();
        let start = codec.normalize(&c, None).unwrap();
        let value = codec
            .merge(
                &c,
                start,
                FieldEdit::SetAnswer {
                    question_id: "cp_02".to_string(),
                    answer: FieldValue::Text("Mainframe".to_string()),
                },
            )
            .unwrap();

        let advisories = codec.validate(&c, &value);
        assert_eq!(advisories.len(), 1);
        assert_eq!(advisories[0].kind, AdvisoryKind::UnknownOption);
        assert_eq!(advisories[0].sub_key.as_deref(), Some("cp_02"));
    }

    #[test]
    fn test_toggle_unknown_question_fails() {
        let result = QuestionListCodec.merge(
            &component(),
            FieldValue::Null,
            FieldEdit::ToggleOption {
                question_id: "nope".to_string(),
                option: "x".to_string(),
            },
        );
        assert_eq!(result, Err(FieldError::UnknownQuestion("nope".to_string())));
    }

    #[test]
    fn test_stale_shape_normalizes_to_default() {
        let value = QuestionListCodec
            .normalize(&component(), Some(&FieldValue::Text("garbage".to_string())))
            .unwrap();
        assert_eq!(choices(&value), Vec::<String>::new());
    }
}
