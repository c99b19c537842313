// Integration tests for the RFQ authoring wizard, end to end

#[cfg(test)]
mod wizard_tests {
    use chrono::NaiveDate;
    use rfq_forms_lib::answers::NumberRange;
    use rfq_forms_lib::session::SessionPhase;
    use rfq_forms_lib::{
        FieldEdit, FieldRegistry, FieldValue, FileDraftSink, MemorySink, SessionOptions,
        StepStatus, WizardSession, WizardStep,
    };
    use std::sync::Arc;
    use tempfile::TempDir;

    fn registry() -> Arc<FieldRegistry> {
        Arc::new(FieldRegistry::with_builtin_codecs())
    }

    /// Answer every required field, using suggestions where the wizard offers them.
    /// The project summary is filled before general info so the title suggestion
    /// can use the project name.
    fn fill_in(wizard: &mut WizardSession) {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        wizard.next();
        assert_eq!(wizard.current_step(), WizardStep::ProjectScope);
        wizard
            .edit(
                "projectScope.ps_summary",
                FieldEdit::SetCell {
                    label: "Project Name".into(),
                    value: "Service Desk".into(),
                },
            )
            .unwrap();
        wizard
            .set_value(
                "projectScope.ps_budget",
                FieldValue::Range(NumberRange {
                    min: Some(40_000.0),
                    max: Some(50_000.0),
                }),
            )
            .unwrap();
        for suggestion in wizard.suggestions_on(today) {
            wizard.apply(&suggestion).unwrap();
        }

        wizard.go_to(WizardStep::GeneralInfo);
        wizard
            .set_value("generalInfo.gi_02", FieldValue::from("Acme"))
            .unwrap();
        wizard
            .set_value("generalInfo.gi_05", FieldValue::from("rfq@acme.test"))
            .unwrap();
        let title = wizard.suggestions_on(today).remove(0);
        assert_eq!(title.value, FieldValue::from("Acme: Service Desk RFQ"));
        wizard.apply(&title).unwrap();

        wizard.go_to(WizardStep::CurrentProcess);
        wizard
            .set_value("currentProcess.cp_01", FieldValue::from("Spreadsheets and email"))
            .unwrap();
        wizard
            .toggle_option("currentProcess.cp_04", "Workflow Automation")
            .unwrap();

        wizard.next();
        assert_eq!(wizard.current_step(), WizardStep::AdditionalProcess);
        wizard
            .set_value("additionalProcess.ap_04", FieldValue::from("Cloud"))
            .unwrap();

        wizard.next();
        assert_eq!(wizard.current_step(), WizardStep::BudgetTimeline);
        for suggestion in wizard.suggestions_on(today) {
            wizard.apply(&suggestion).unwrap();
        }

        wizard.next();
        assert_eq!(wizard.current_step(), WizardStep::EvaluationCriteria);
        for suggestion in wizard.suggestions_on(today) {
            wizard.apply(&suggestion).unwrap();
        }

        wizard.next();
        assert_eq!(wizard.current_step(), WizardStep::Review);
    }

    #[test]
    fn test_completed_wizard_marks_every_step() {
        let mut wizard = WizardSession::start(registry(), SessionOptions::new());
        assert_eq!(wizard.completion_percentage(), 0);

        fill_in(&mut wizard);

        for (step, status) in wizard.step_statuses() {
            assert_eq!(status, StepStatus::Complete, "step {}", step);
        }
        assert_eq!(wizard.completion_percentage(), 100);
    }

    #[test]
    fn test_budget_breakdown_follows_budget() {
        let mut wizard = WizardSession::start(registry(), SessionOptions::new());
        fill_in(&mut wizard);

        let Some(FieldValue::KeyValueRows(rows)) = wizard.get("projectScope.ps_budget_breakdown")
        else {
            panic!("expected breakdown rows");
        };
        let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![20_000.0, 15_000.0, 10_000.0, 5_000.0]);
        let total: f64 = rows.iter().filter_map(|r| r.percentage).sum();
        assert_eq!(total, 100.0);
    }

    #[tokio::test]
    async fn test_submitted_document_is_step_keyed() {
        let submissions = Arc::new(MemorySink::new());
        let mut wizard = WizardSession::start(
            registry(),
            SessionOptions::new().with_submission_sink(submissions.clone()),
        );
        fill_in(&mut wizard);
        wizard.submit().await.unwrap();

        let data = submissions.last().unwrap();
        let keys: Vec<&str> = data.keys().map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "additionalProcess",
                "budgetTimeline",
                "currentProcess",
                "evaluationCriteria",
                "generalInfo",
                "projectScope",
            ]
        );
        let current = data["currentProcess"].as_map().unwrap();
        assert_eq!(
            current["cp_04"],
            FieldValue::Choices(vec!["Workflow Automation".to_string()])
        );
        let timeline = data["budgetTimeline"].as_map().unwrap();
        assert_eq!(timeline["bt_response_deadline"], FieldValue::from("2026-11-09"));

        assert_eq!(wizard.status().phase, SessionPhase::Submitted);
        assert!(wizard
            .set_value("generalInfo.gi_02", FieldValue::from("Other"))
            .is_err());
    }

    #[tokio::test]
    async fn test_wizard_draft_resumes() {
        let temp = TempDir::new().unwrap();
        let drafts = temp.path().to_path_buf();

        {
            let wizard = WizardSession::start(
                registry(),
                SessionOptions::new()
                    .with_session_id("rfq-42")
                    .with_file_drafts(FileDraftSink::new(&drafts, "rfq-42", "Create RFQ")),
            );
            wizard
                .set_value("generalInfo.gi_02", FieldValue::from("Acme"))
                .unwrap();
            wizard
                .toggle_option("currentProcess.cp_04", "Integrations")
                .unwrap();
            wizard.save_now().await.unwrap();
        }

        let resumed = WizardSession::start(
            registry(),
            SessionOptions::new()
                .with_session_id("rfq-42")
                .with_file_drafts(FileDraftSink::new(&drafts, "rfq-42", "Create RFQ")),
        );
        assert_eq!(resumed.get("generalInfo.gi_02"), Some(FieldValue::from("Acme")));
        assert_eq!(
            resumed.get("currentProcess.cp_04"),
            Some(FieldValue::Choices(vec!["Integrations".to_string()]))
        );
        assert_eq!(resumed.step_status(WizardStep::GeneralInfo), StepStatus::InProgress);
    }
}
