use std::collections::HashMap;
use std::collections::HashSet;

use super::node::{NodeKind, ValueNode};

/// Resolves a node's tree to a string, iteratively (no recursion) so that
/// deep provenance chains don't blow the stack, and with per-node
/// memoization so that a node shared by multiple parents is assembled once.
///
/// Mirrors `iterativeResolve` in
/// `original_source/quark/core/struct/valuenode.py`: an explicit work stack
/// of `(node, partial_child_strings)` frames, a cache checked before
/// descending into each child, and a final assembly step once all of a
/// node's children are resolved.
pub(super) fn iterative_resolve(root: &ValueNode, evaluate_args: bool) -> String {
    if let Some(cached) = cached(root, evaluate_args) {
        return cached;
    }

    // Frame: the node being assembled, its children, and the strings
    // collected for children visited so far.
    struct Frame<'a> {
        node: &'a ValueNode,
        children: &'a [ValueNode],
        child_strings: Vec<String>,
    }

    let mut stack: Vec<Frame> = vec![Frame {
        node: root,
        children: root.children(),
        child_strings: Vec::new(),
    }];
    // Pointer identities currently on the DFS path, to detect genuine
    // cycles without confusing them with legitimate DAG sharing (which the
    // cache above already short-circuits).
    let mut on_path: HashSet<usize> = HashSet::new();
    on_path.insert(root.ptr_id());

    loop {
        let frame = stack.last_mut().expect("resolve stack is never empty here");
        let next_index = frame.child_strings.len();

        if next_index < frame.children.len() {
            let child = &frame.children[next_index];
            if let Some(cached) = cached(child, evaluate_args) {
                frame.child_strings.push(cached);
                continue;
            }
            if !on_path.insert(child.ptr_id()) {
                // Genuine cycle: the same node is already being assembled
                // further up this exact path.
                frame.child_strings.push("<...recursion...>".to_string());
                continue;
            }
            stack.push(Frame {
                node: child,
                children: child.children(),
                child_strings: Vec::new(),
            });
            continue;
        }

        let frame = stack.pop().expect("just matched above");
        let resolved = assemble(frame.node, &frame.child_strings, evaluate_args);
        store(frame.node, evaluate_args, resolved.clone());
        on_path.remove(&frame.node.ptr_id());

        match stack.last_mut() {
            Some(parent) => parent.child_strings.push(resolved),
            None => return resolved,
        }
    }
}

fn cached(node: &ValueNode, evaluate_args: bool) -> Option<String> {
    let slot = if evaluate_args {
        &node.0.resolved_with_args
    } else {
        &node.0.resolved_without_args
    };
    slot.get().cloned()
}

fn store(node: &ValueNode, evaluate_args: bool, value: String) {
    let slot = if evaluate_args {
        &node.0.resolved_with_args
    } else {
        &node.0.resolved_without_args
    };
    // Another resolution of a shared node may have raced us to fill this;
    // either value is equally correct since assembly is pure.
    let _ = slot.set(value);
}

fn assemble(node: &ValueNode, child_strings: &[String], evaluate_args: bool) -> String {
    match node.kind() {
        NodeKind::Primitive(data) => {
            if evaluate_args {
                evaluate_argument(&data.value, data.value_type.as_deref())
            } else {
                data.value.clone()
            }
        }
        NodeKind::MethodCall(data) => {
            format!("{}({})", data.method, child_strings.join(","))
        }
        NodeKind::BytecodeOps(data) => {
            let mut values: HashMap<String, String> = HashMap::with_capacity(child_strings.len() + 1);
            for (i, s) in child_strings.iter().enumerate() {
                values.insert(format!("src{i}"), s.clone());
            }
            values.insert("data".to_string(), data.data.clone());
            interpolate(&data.str_format, &values)
        }
    }
}

/// Evaluates a primitive's textual value against its Dalvik type hint,
/// matching `evaluateArgument` in the original: integral/boolean/float
/// hints attempt a parse and fall back to the raw text unchanged on
/// failure; any other hint (including none) returns the raw text.
fn evaluate_argument(argument: &str, type_hint: Option<&str>) -> String {
    match type_hint {
        Some("I") | Some("B") | Some("S") | Some("J") => argument
            .parse::<i64>()
            .map(|v| v.to_string())
            .unwrap_or_else(|_| argument.to_string()),
        Some("Z") => argument
            .parse::<i64>()
            .map(|v| if v != 0 { "True".to_string() } else { "False".to_string() })
            .unwrap_or_else(|_| argument.to_string()),
        Some("F") | Some("D") => argument
            .parse::<f64>()
            .map(python_float_repr)
            .unwrap_or_else(|_| argument.to_string()),
        _ => argument.to_string(),
    }
}

/// Formats a float the way Python's `str(float(x))` does: always at least
/// one digit after the decimal point (`3.0`, not `3`).
fn python_float_repr(value: f64) -> String {
    let repr = value.to_string();
    if repr.contains('.') || repr.contains('e') || repr.contains("inf") || repr.contains("NaN") {
        repr
    } else {
        format!("{repr}.0")
    }
}

/// Substitutes `{key}` placeholders in `template` with `values[key]`,
/// leaving unrecognized placeholders untouched.
fn interpolate(template: &str, values: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let bytes = template.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            if let Some(end) = template[i + 1..].find('}') {
                let key = &template[i + 1..i + 1 + end];
                if let Some(value) = values.get(key) {
                    out.push_str(value);
                    i = i + 1 + end + 1;
                    continue;
                }
            }
        }
        let ch = template[i..].chars().next().unwrap();
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}
