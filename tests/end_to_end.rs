//! End-to-end scenarios: each test feeds real source text through the full
//! pipeline (scanner -> parser -> TAC generator) and asserts on the rendered
//! listing.

use blockc::{compile, instruction::render_program};
use pretty_assertions::assert_eq;

#[test]
fn scenario_1_assignment() {
    let output = compile("{ int x ; x = 3 + 4 ; }").unwrap();
    assert!(output.syntax_errors.is_empty());
    assert!(output.semantic_errors.is_empty());
    assert_eq!(
        render_program(&output.instructions),
        "BEGIN_BLOCK (Line: 1)\nDECLARE x : int (Line: 1)\n(+, 3, 4, t0)\n(=, t0, _, x_scope1)\nEND_BLOCK (Line: 1)"
    );
}

#[test]
fn scenario_2_dangling_else_binds_to_inner_if() {
    let output = compile("{ int a ; if ( a ) if ( a ) a = 1 ; else a = 2 ; }").unwrap();
    assert!(output.syntax_errors.is_empty());
    let rendered = render_program(&output.instructions);
    let if_false_goto_count = rendered.matches("iffalse").count();
    let goto_count = rendered.matches("(goto").count();
    let label_count = rendered.lines().filter(|l| l.starts_with('L')).count();
    assert_eq!(if_false_goto_count, 2);
    assert_eq!(goto_count, 1);
    assert_eq!(label_count, 3);
}

#[test]
fn scenario_3_while_with_break_targets_loop_exit() {
    let output = compile("{ int i ; while ( i ) { if ( i ) break ; i = i ; } }").unwrap();
    assert!(output.syntax_errors.is_empty());
    let rendered = render_program(&output.instructions);
    // The break's goto target must equal the label following the loop's closing
    // unconditional jump back to its condition.
    let lines: Vec<&str> = rendered.lines().collect();
    let goto_cond_idx = lines
        .iter()
        .position(|l| l.starts_with("(goto"))
        .expect("loop must emit a backward goto to its condition label");
    let exit_label_line = lines[goto_cond_idx + 1];
    let exit_label = exit_label_line.trim_end_matches(':');
    let break_goto = format!("(goto, _, _, {})", exit_label);
    assert!(rendered.contains(&break_goto), "break should jump to {}", exit_label);
}

#[test]
fn scenario_4_short_circuit_and() {
    let output = compile("{ bool p ; bool q ; p = p && q ; }").unwrap();
    assert!(output.syntax_errors.is_empty());
    assert_eq!(
        render_program(&output.instructions),
        "BEGIN_BLOCK (Line: 1)\nDECLARE p : bool (Line: 1)\nDECLARE q : bool (Line: 1)\n\
         (iffalse, p_scope1, _, L0)\n(iffalse, q_scope1, _, L0)\n(=, true, _, t0)\n\
         (goto, _, _, L1)\nL0:\n(=, false, _, t0)\nL1:\n(=, t0, _, p_scope1)\nEND_BLOCK (Line: 1)"
    );
}

#[test]
fn scenario_5_array_element_store() {
    let output = compile("{ int a [ 10 ] ; a [ 2 ] = 5 ; }").unwrap();
    assert!(output.syntax_errors.is_empty());
    assert_eq!(
        render_program(&output.instructions),
        "BEGIN_BLOCK (Line: 1)\nDECLARE a : array(int,10) (Line: 1)\n(*, 2, 4, t0)\n\
         (+, a_scope1, t0, t1)\n(store, t1, 5, _)\nEND_BLOCK (Line: 1)"
    );
}

#[test]
fn scenario_6_do_while() {
    let output = compile("{ int i ; do i = i ; while ( i ) ; }").unwrap();
    assert!(output.syntax_errors.is_empty());
    let rendered = render_program(&output.instructions);
    let lines: Vec<&str> = rendered.lines().collect();
    assert!(lines[1].starts_with("DECLARE i"));
    assert!(lines[2].starts_with('L'), "do-while body starts right after a start label");
    assert!(rendered.contains("(iftrue, i_scope1, _,"));
}
