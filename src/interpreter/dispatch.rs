//! Mnemonic classification: the Rust stand-in for the original's
//! per-mnemonic dispatch dict.
//!
//! `classify_mnemonic` parses a raw mnemonic string once into a closed
//! [`MnemonicKind`]; [`state::Interpreter::step`] then dispatches on it with
//! an exhaustive `match`, which the compiler lowers to a jump table —
//! the same "immutable dispatch table" the design notes ask for, expressed
//! with an enum instead of a hand-maintained map of ~200 string keys to
//! closures.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeKind {
    Virtual,
    Direct,
    Static,
    Interface,
    Super,
    Polymorphic,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryForm {
    Normal,
    TwoAddr,
    Lit8,
    Lit16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicKind<'a> {
    Invoke { kind: InvokeKind, range: bool },
    MoveResult { wide: bool, object: bool },
    Move { wide: bool, object: bool },
    MoveException,
    ConstString { jumbo: bool },
    ConstClass,
    Const { wide: bool },
    NewInstance,
    NewArray,
    FilledNewArray { range: bool },
    FillArrayData,
    /// `postfix` is the raw text after `aget`/`aget-` (`""` for the bare
    /// 32-bit form, `"object"`, `"boolean"`, `"byte"`, `"char"`, `"short"`,
    /// or `"wide"`), kept so the handler can look it up in the
    /// postfix->descriptor table without re-parsing the mnemonic.
    ArrayGet { wide: bool, postfix: &'a str },
    ArrayPut { wide: bool },
    /// `type_token` is the postfix after `neg`/`not` (`"int"`, `"long"`, ...).
    Unary { wide: bool, type_token: &'a str },
    /// `to_token` is the destination half of an `X-to-Y` cast (`"byte"` for
    /// `int-to-byte`), used to look up the destination's descriptor.
    Cast { from_wide: bool, to_wide: bool, to_token: &'a str },
    /// `type_token` is the operand type postfix (`"int"`, `"long"`, ...)
    /// shared by the `/2addr`, `/lit8`, and `/lit16` forms alike.
    Binary { wide: bool, form: BinaryForm, type_token: &'a str },
    Unsupported,
}

const WIDE_TYPE_TOKENS: [&str; 2] = ["long", "double"];

fn is_wide_token(token: &str) -> bool {
    WIDE_TYPE_TOKENS.contains(&token)
}

#[must_use]
pub fn classify_mnemonic(mnemonic: &str) -> MnemonicKind<'_> {
    if let Some(rest) = mnemonic.strip_prefix("invoke-") {
        let range = rest.ends_with("/range");
        let base = rest.strip_suffix("/range").unwrap_or(rest);
        let kind = match base {
            "virtual" => InvokeKind::Virtual,
            "direct" => InvokeKind::Direct,
            "static" => InvokeKind::Static,
            "interface" => InvokeKind::Interface,
            "super" => InvokeKind::Super,
            "polymorphic" => InvokeKind::Polymorphic,
            "custom" => InvokeKind::Custom,
            _ => return MnemonicKind::Unsupported,
        };
        return MnemonicKind::Invoke { kind, range };
    }

    if let Some(rest) = mnemonic.strip_prefix("move-result") {
        return MnemonicKind::MoveResult {
            wide: rest == "-wide",
            object: rest == "-object",
        };
    }

    if mnemonic == "move-exception" {
        return MnemonicKind::MoveException;
    }

    if mnemonic.starts_with("move") {
        let wide = mnemonic.starts_with("move-wide");
        let object = mnemonic.starts_with("move-object");
        return MnemonicKind::Move { wide, object };
    }

    if mnemonic == "const-string" || mnemonic == "const-string/jumbo" {
        return MnemonicKind::ConstString {
            jumbo: mnemonic.ends_with("/jumbo"),
        };
    }

    if mnemonic == "const-class" {
        return MnemonicKind::ConstClass;
    }

    if mnemonic.starts_with("const") {
        return MnemonicKind::Const {
            wide: mnemonic.starts_with("const-wide"),
        };
    }

    if mnemonic == "new-instance" {
        return MnemonicKind::NewInstance;
    }

    if mnemonic == "new-array" {
        return MnemonicKind::NewArray;
    }

    if mnemonic.starts_with("filled-new-array") {
        return MnemonicKind::FilledNewArray {
            range: mnemonic.ends_with("/range"),
        };
    }

    if mnemonic == "fill-array-data" {
        return MnemonicKind::FillArrayData;
    }

    if mnemonic.starts_with("aget") {
        let postfix = mnemonic.strip_prefix("aget").unwrap_or("").trim_start_matches('-');
        return MnemonicKind::ArrayGet {
            wide: mnemonic == "aget-wide",
            postfix,
        };
    }

    if mnemonic.starts_with("aput") {
        return MnemonicKind::ArrayPut {
            wide: mnemonic == "aput-wide",
        };
    }

    if mnemonic.starts_with("neg-") || mnemonic.starts_with("not-") {
        let type_token = mnemonic.rsplit('-').next().unwrap_or("");
        return MnemonicKind::Unary {
            wide: is_wide_token(type_token),
            type_token,
        };
    }

    if mnemonic.contains("-to-") {
        let mut parts = mnemonic.split("-to-");
        let from = parts.next().unwrap_or("");
        let to = parts.next().unwrap_or("");
        return MnemonicKind::Cast {
            from_wide: is_wide_token(from),
            to_wide: is_wide_token(to),
            to_token: to,
        };
    }

    if let Some(form) = binary_form(mnemonic) {
        let base = strip_binary_suffix(mnemonic);
        let wide = base.ends_with("-long") || base.ends_with("-double");
        let type_token = binary_type_token(base);
        return MnemonicKind::Binary { wide, form, type_token };
    }

    MnemonicKind::Unsupported
}

const BINARY_PREFIXES: [&str; 12] = [
    "add-", "sub-", "rsub-", "mul-", "div-", "rem-", "and-", "or-", "xor-", "shl-", "shr-", "ushr-",
];

fn is_binary_mnemonic(mnemonic: &str) -> bool {
    BINARY_PREFIXES.iter().any(|p| mnemonic.starts_with(p))
}

fn binary_form(mnemonic: &str) -> Option<BinaryForm> {
    if !is_binary_mnemonic(mnemonic) {
        return None;
    }
    if mnemonic.ends_with("/2addr") {
        Some(BinaryForm::TwoAddr)
    } else if mnemonic.ends_with("/lit8") {
        Some(BinaryForm::Lit8)
    } else if mnemonic.ends_with("/lit16") {
        Some(BinaryForm::Lit16)
    } else {
        Some(BinaryForm::Normal)
    }
}

fn strip_binary_suffix(mnemonic: &str) -> &str {
    mnemonic
        .strip_suffix("/2addr")
        .or_else(|| mnemonic.strip_suffix("/lit8"))
        .or_else(|| mnemonic.strip_suffix("/lit16"))
        .unwrap_or(mnemonic)
}

/// The type postfix of a binary mnemonic with its `/2addr`, `/lit8`, or
/// `/lit16` suffix already stripped (`"add-int"` -> `"int"`).
fn binary_type_token(base: &str) -> &str {
    BINARY_PREFIXES
        .iter()
        .find_map(|prefix| base.strip_prefix(prefix))
        .unwrap_or(base)
}
