use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseResult};
use registration_widgets::Harness;

const WIDGET_PROPTEST_REGRESSION_FILE: &str =
    "tests/proptest-regressions/widget_property_fuzz_test.txt";
const DEFAULT_WIDGET_PROPTEST_CASES: u32 = 256;

const OPTION_VALUES: [&str; 4] = ["定休日1", "定休日2", "定休日3", "不定休"];

const HOLIDAY_FORM_HTML: &str = r#"
<form action="/restaurants/register/" method="post">
  <div id="holiday-box">
    <span class="holiday-text">選択してください</span>
    <span class="holiday-arrow">▼</span>
    <ul id="holiday-options" class="hidden">
      <li class="holiday-option" data-value="定休日1">定休日1</li>
      <li class="holiday-option" data-value="定休日2">定休日2</li>
      <li class="holiday-option" data-value="定休日3">定休日3</li>
      <li class="holiday-option" data-value="不定休">不定休</li>
    </ul>
  </div>
  <div id="holiday-hidden-container"></div>
</form>
"#;

#[derive(Clone, Debug)]
enum PickerAction {
    ClickOption(usize),
    ToggleBox,
}

fn widget_proptest_cases() -> u32 {
    std::env::var("REGISTRATION_WIDGETS_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_WIDGET_PROPTEST_CASES)
}

fn picker_action_strategy() -> BoxedStrategy<PickerAction> {
    prop_oneof![
        4 => (0..OPTION_VALUES.len()).prop_map(PickerAction::ClickOption),
        1 => Just(PickerAction::ToggleBox),
    ]
    .boxed()
}

fn picker_action_sequence_strategy() -> BoxedStrategy<Vec<PickerAction>> {
    vec(picker_action_strategy(), 1..=32).boxed()
}

/// Reference model: which option values are selected (toggled an odd number
/// of times or seeded), and whether the list is open (toggle parity).
#[derive(Default)]
struct PickerModel {
    selected: Vec<&'static str>,
    open: bool,
}

impl PickerModel {
    fn toggle_option(&mut self, index: usize) {
        let value = OPTION_VALUES[index];
        if let Some(pos) = self.selected.iter().position(|v| *v == value) {
            self.selected.remove(pos);
        } else {
            self.selected.push(value);
        }
    }

    /// Expected mirror/label order: document order of the options, never
    /// click order.
    fn expected_values(&self) -> Vec<&'static str> {
        OPTION_VALUES
            .iter()
            .copied()
            .filter(|value| self.selected.contains(value))
            .collect()
    }

    fn expected_label(&self) -> String {
        let values = self.expected_values();
        if values.is_empty() {
            "選択してください".to_string()
        } else {
            values.join("、")
        }
    }
}

fn run_action(harness: &mut Harness, action: &PickerAction) -> registration_widgets::Result<()> {
    match action {
        PickerAction::ClickOption(index) => {
            let value = OPTION_VALUES[*index];
            harness.click(&format!(r#"li[data-value="{value}"]"#))
        }
        PickerAction::ToggleBox => harness.click("#holiday-box"),
    }
}

fn assert_picker_sequence_is_consistent(actions: &[PickerAction]) -> TestCaseResult {
    let mut harness = Harness::from_html(HOLIDAY_FORM_HTML)
        .map_err(|err| proptest::test_runner::TestCaseError::fail(format!("{err:?}")))?;
    let mut model = PickerModel::default();

    for (step, action) in actions.iter().enumerate() {
        if let Err(error) = run_action(&mut harness, action) {
            prop_assert!(
                false,
                "action returned error at step {step}: {action:?}, error={error:?}, actions={actions:?}"
            );
        }
        match action {
            PickerAction::ClickOption(index) => model.toggle_option(*index),
            PickerAction::ToggleBox => model.open = !model.open,
        }

        let expected = model.expected_values();
        let mirror = harness.form_values("holiday");
        prop_assert_eq!(
            mirror.len(),
            expected.len(),
            "mirror cardinality diverged at step {}: {:?}",
            step,
            action
        );
        prop_assert_eq!(
            &mirror,
            &expected,
            "mirror content diverged at step {}: {:?}, actions={:?}",
            step,
            action,
            actions
        );
        prop_assert_eq!(
            &harness.holiday_selection(),
            &expected,
            "selection diverged at step {}: {:?}",
            step,
            action
        );
        prop_assert_eq!(
            harness
                .text(".holiday-text")
                .map_err(|err| proptest::test_runner::TestCaseError::fail(format!("{err:?}")))?,
            model.expected_label(),
            "label diverged at step {}: {:?}",
            step,
            action
        );
        prop_assert_eq!(
            harness.holiday_open(),
            model.open,
            "open state diverged at step {}: {:?}",
            step,
            action
        );
    }

    Ok(())
}

fn assert_double_toggle_is_idempotent(
    actions: &[PickerAction],
    extra_option: usize,
) -> TestCaseResult {
    let mut harness = Harness::from_html(HOLIDAY_FORM_HTML)
        .map_err(|err| proptest::test_runner::TestCaseError::fail(format!("{err:?}")))?;
    for action in actions {
        run_action(&mut harness, action)
            .map_err(|err| proptest::test_runner::TestCaseError::fail(format!("{err:?}")))?;
    }

    let selection_before = harness.holiday_selection();
    let mirror_before = harness.form_values("holiday");
    let label_before = harness
        .text(".holiday-text")
        .map_err(|err| proptest::test_runner::TestCaseError::fail(format!("{err:?}")))?;

    let toggle = PickerAction::ClickOption(extra_option % OPTION_VALUES.len());
    run_action(&mut harness, &toggle)
        .map_err(|err| proptest::test_runner::TestCaseError::fail(format!("{err:?}")))?;
    run_action(&mut harness, &toggle)
        .map_err(|err| proptest::test_runner::TestCaseError::fail(format!("{err:?}")))?;

    prop_assert_eq!(harness.holiday_selection(), selection_before);
    prop_assert_eq!(harness.form_values("holiday"), mirror_before);
    prop_assert_eq!(
        harness
            .text(".holiday-text")
            .map_err(|err| proptest::test_runner::TestCaseError::fail(format!("{err:?}")))?,
        label_before
    );
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: widget_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(WIDGET_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn picker_mirror_and_label_track_the_model(actions in picker_action_sequence_strategy()) {
        assert_picker_sequence_is_consistent(&actions)?;
    }

    #[test]
    fn double_toggle_restores_prior_state(
        actions in picker_action_sequence_strategy(),
        extra_option in 0usize..16,
    ) {
        assert_double_toggle_is_idempotent(&actions, extra_option)?;
    }
}
