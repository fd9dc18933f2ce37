//! Infix to postfix conversion: scanning, implicit concatenation insertion
//! and the Shunting-Yard algorithm. All three passes are total; unbalanced
//! group markers are passed through for [super::Regex::to_nfa] to reject.

use super::{RegexOp, RegexToken};

/// Splits an expression into tokens. Every character outside the reserved
/// operator set is a literal; there is no escaping.
pub(crate) fn scan(input: &str) -> Vec<RegexToken> {
    input
        .chars()
        .enumerate()
        .map(|(pos, ch)| match ch {
            '|' => RegexToken::Op {
                op: RegexOp::Alt,
                pos,
            },
            '*' => RegexToken::Op {
                op: RegexOp::Star,
                pos,
            },
            '+' => RegexToken::Op {
                op: RegexOp::Plus,
                pos,
            },
            '?' => RegexToken::Op {
                op: RegexOp::Question,
                pos,
            },
            '(' => RegexToken::Open { pos },
            ')' => RegexToken::Close { pos },
            _ => RegexToken::Literal { ch, pos },
        })
        .collect()
}

/// Inserts the implicit concatenation operator. A concatenation joins two
/// adjacent tokens exactly when the left one can end an operand (a literal, a
/// closing parenthesis or a postfix operator) and the right one can begin one
/// (a literal or an opening parenthesis).
pub(crate) fn insert_concat(tokens: Vec<RegexToken>) -> Vec<RegexToken> {
    let ends_operand = |token: &RegexToken| {
        matches!(
            token,
            RegexToken::Literal { .. }
                | RegexToken::Close { .. }
                | RegexToken::Op {
                    op: RegexOp::Star | RegexOp::Plus | RegexOp::Question,
                    ..
                }
        )
    };
    let begins_operand =
        |token: &RegexToken| matches!(token, RegexToken::Literal { .. } | RegexToken::Open { .. });

    let mut out = Vec::with_capacity(tokens.len() * 2);
    for token in tokens {
        if let Some(prev) = out.last() {
            if ends_operand(prev) && begins_operand(&token) {
                out.push(RegexToken::Op {
                    op: RegexOp::Concat,
                    pos: token_pos(&token),
                });
            }
        }
        out.push(token);
    }
    out
}

/// Shunting-Yard conversion to postfix. `|` and concatenation are
/// left-associative binary operators; the postfix repetition operators apply
/// to the operand already emitted, so they go straight to the output.
/// Unbalanced parentheses are not diagnosed here: stray group markers end up
/// in the output stream.
pub(crate) fn to_postfix(tokens: Vec<RegexToken>) -> Vec<RegexToken> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut stack: Vec<RegexToken> = Vec::new();

    for token in tokens {
        match token {
            RegexToken::Literal { .. } => out.push(token),
            RegexToken::Op {
                op: RegexOp::Star | RegexOp::Plus | RegexOp::Question,
                ..
            } => out.push(token),
            RegexToken::Op { op, .. } => {
                while let Some(&top) = stack.last() {
                    match top {
                        RegexToken::Op { op: top_op, .. }
                            if top_op.precedence() >= op.precedence() =>
                        {
                            out.push(top);
                            stack.pop();
                        }
                        _ => break,
                    }
                }
                stack.push(token);
            }
            RegexToken::Open { .. } => stack.push(token),
            RegexToken::Close { .. } => {
                let mut matched = false;
                while let Some(top) = stack.pop() {
                    if matches!(top, RegexToken::Open { .. }) {
                        matched = true;
                        break;
                    }
                    out.push(top);
                }
                if !matched {
                    // The NFA builder reports this as an unmatched ')'
                    out.push(token);
                }
            }
        }
    }

    while let Some(top) = stack.pop() {
        out.push(top);
    }
    out
}

fn token_pos(token: &RegexToken) -> usize {
    match token {
        RegexToken::Literal { pos, .. }
        | RegexToken::Op { pos, .. }
        | RegexToken::Open { pos }
        | RegexToken::Close { pos } => *pos,
    }
}
