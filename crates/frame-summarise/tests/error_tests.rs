mod common;

use common::{f, in_group, run, sales, sales_by};
use frame_columnar::GroupedTable;
use frame_summarise::{
    summarise, Entry, Expr, ExprError, GroupsOption, Stage, SummariseError, SummariseOptions,
};
use pretty_assertions::assert_eq;

#[test]
fn evaluation_errors_name_the_entry_and_group() {
    let data = sales_by(&["region"]);
    let err = run(&data, vec![Entry::unnamed(f("sum", Expr::col("missing")))]).unwrap_err();

    assert_eq!(
        err,
        SummariseError::Evaluation {
            entry: "sum(missing)".into(),
            group: Some("group 1: `region = \"east\"`".into()),
            source: ExprError::UnknownName("missing".into()),
        }
    );
    assert_eq!(err.stage(), Some(Stage::Computing));
    assert_eq!(
        err.bullets(),
        vec![
            "Problem while computing `sum(missing)`.".to_string(),
            "Caused by error: object `missing` not found".to_string(),
            "The error occurred in group 1: `region = \"east\"`.".to_string(),
        ]
    );
}

#[test]
fn ungrouped_errors_carry_no_group_label() {
    let data = GroupedTable::ungrouped(sales());
    let err = run(
        &data,
        vec![Entry::named("bad", Expr::call("nope", vec![Expr::col("amount")]))],
    )
    .unwrap_err();

    assert_eq!(err.group(), None);
    assert_eq!(err.entry(), Some("bad"));
    assert_eq!(
        err.to_string(),
        "problem while computing `bad`: could not find function `nope`"
    );
    assert_eq!(err.bullets().len(), 2);
}

#[test]
fn function_results_are_unsupported() {
    let data = sales_by(&["region"]);
    let err = run(&data, vec![Entry::named("fun", Expr::Function("mean".into()))]).unwrap_err();

    assert_eq!(
        err,
        SummariseError::UnsupportedResultKind {
            entry: "fun".into(),
            kind: "a function".into(),
            group: Some("group 1: `region = \"east\"`".into()),
        }
    );
}

#[test]
fn incompatible_types_across_groups_abort() {
    let data = sales_by(&["region"]);
    let err = run(
        &data,
        vec![Entry::named(
            "v",
            Expr::if_else(
                in_group(1),
                f("sum", Expr::col("amount")),
                f("first", Expr::col("product")),
            ),
        )],
    )
    .unwrap_err();

    assert_eq!(
        err,
        SummariseError::IncompatibleCombine {
            entry: "v".into(),
            previous: "integer".into(),
            previous_group: Some("group 1: `region = \"east\"`".into()),
            actual: "text".into(),
            group: Some("group 2: `region = \"west\"`".into()),
        }
    );
    assert_eq!(
        err.bullets()[2..].to_vec(),
        vec![
            "Result of type <integer> for group 1: `region = \"east\"`.".to_string(),
            "Result of type <text> for group 2: `region = \"west\"`.".to_string(),
        ]
    );
}

#[test]
fn sub_tables_cannot_mix_with_vectors() {
    let data = sales_by(&["region"]);
    let err = run(
        &data,
        vec![Entry::named(
            "t",
            Expr::if_else(
                in_group(1),
                Expr::tibble([("a", Expr::lit(1)), ("b", Expr::lit(2))]),
                Expr::lit(1),
            ),
        )],
    )
    .unwrap_err();
    assert!(matches!(err, SummariseError::IncompatibleCombine { .. }));
}

#[test]
fn sub_tables_cannot_mix_with_empty_results() {
    let data = sales_by(&["region"]);
    let err = run(
        &data,
        vec![Entry::named(
            "t",
            Expr::if_else(
                in_group(1),
                Expr::tibble([("a", Expr::lit(1)), ("b", Expr::lit(2))]),
                Expr::Null,
            ),
        )],
    )
    .unwrap_err();

    assert_eq!(
        err,
        SummariseError::MixedNull {
            entry: "t".into(),
            group: Some("group 2: `region = \"west\"`".into()),
        }
    );
    assert_eq!(err.stage(), Some(Stage::Computing));
}

#[test]
fn strict_promotion_refuses_to_widen() {
    let data = sales_by(&["region"]);
    let entries = [Entry::named(
        "mixed",
        Expr::if_else(
            in_group(1),
            f("sum", Expr::col("amount")),
            f("mean", Expr::col("price")),
        ),
    )];
    let options = SummariseOptions::default()
        .sequential()
        .with_promotion(frame_columnar::StrictPromotion);

    let err = summarise(&data, &entries, &options).unwrap_err();
    assert!(matches!(
        err,
        SummariseError::IncompatibleCombine { ref previous, ref actual, .. }
            if previous == "integer" && actual == "double"
    ));
}

#[test]
fn rowwise_input_rejects_drop() {
    let data = GroupedTable::rowwise(sales(), &["region"]).unwrap();
    let err = summarise(
        &data,
        &[Entry::named("a", Expr::col("amount"))],
        &SummariseOptions::default()
            .sequential()
            .with_groups(GroupsOption::Drop),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        SummariseError::InvalidGroupingOption { ref value, .. } if value == "drop"
    ));
    assert_eq!(err.stage(), None);
}

#[test]
fn failures_inside_later_entries_still_abort_the_call() {
    let data = sales_by(&["region"]);
    let err = run(
        &data,
        vec![
            Entry::named("ok", f("sum", Expr::col("amount"))),
            Entry::named("bad", f("sum", Expr::col("product"))),
        ],
    )
    .unwrap_err();

    assert_eq!(err.entry(), Some("bad"));
    assert!(matches!(
        err,
        SummariseError::Evaluation {
            source: ExprError::Type(_),
            ..
        }
    ));
}
