//! Security matchers.
//!
//! Each matcher is a pure predicate over a single node shape; none of them
//! needs scope or loop context. Returns at most one diagnostic per node.

use rustpython_parser::ast::{self, Constant, Expr};

use crate::diagnostics::Diagnostic;

pub const DANGEROUS_CALL_CODE: &str = "CVE-2025-3248";
pub const RISKY_IMPORT_CODE: &str = "CVE-2025-27607";

const RISKY_MODULE: &str = "python_json_logger";
const SECRET_MARKERS: [&str; 5] = ["key", "secret", "password", "token", "passwd"];
const SUBPROCESS_ENTRY_POINTS: [&str; 4] = ["run", "Popen", "call", "check_output"];

/// `exec(...)` / `eval(...)` on the bare builtin name.
pub fn dangerous_call(call: &ast::ExprCall, line: usize) -> Option<Diagnostic> {
    let name = call_name(call)?;
    if !matches!(name, "exec" | "eval") {
        return None;
    }
    Some(
        Diagnostic::security(
            line,
            format!(
                "Use of '{name}()' detected. \
                 This can lead to code injection (e.g. CVE-2025-3248 in Langflow)."
            ),
        )
        .with_code(DANGEROUS_CALL_CODE)
        .with_remediation(
            "Consider safer alternatives (e.g., ast.literal_eval) or explicit parsing.",
        ),
    )
}

/// `import python_json_logger` (exact or dotted prefix), one hit per alias.
pub fn risky_import(alias: &ast::Alias, line: usize) -> Option<Diagnostic> {
    if !is_risky_module(alias.name.as_str()) {
        return None;
    }
    Some(risky_import_diagnostic(
        line,
        "'python_json_logger' import detected.",
    ))
}

/// `from python_json_logger[...] import ...`.
pub fn risky_import_from(module: Option<&str>, line: usize) -> Option<Diagnostic> {
    if !is_risky_module(module.unwrap_or_default()) {
        return None;
    }
    Some(risky_import_diagnostic(
        line,
        "'from python_json_logger import ...' detected.",
    ))
}

fn is_risky_module(name: &str) -> bool {
    name == RISKY_MODULE || name.starts_with("python_json_logger.")
}

fn risky_import_diagnostic(line: usize, lead: &str) -> Diagnostic {
    Diagnostic::security(
        line,
        format!(
            "{lead} This package was vulnerable to RCE \
             between Dec 30, 2024 and Mar 4, 2025 (CVE-2025-27607)."
        ),
    )
    .with_code(RISKY_IMPORT_CODE)
    .with_remediation("Update to a patched version or remove this dependency.")
}

/// `subprocess.run(...)` and friends with the literal keyword `shell=True`.
pub fn shell_enabled_subprocess(call: &ast::ExprCall, line: usize) -> Option<Diagnostic> {
    let (module, attr) = attribute_call(call)?;
    if module != "subprocess" || !SUBPROCESS_ENTRY_POINTS.contains(&attr) {
        return None;
    }
    let shell_enabled = call.keywords.iter().any(|kw| {
        kw.arg.as_ref().map(|arg| arg.as_str()) == Some("shell")
            && matches!(&kw.value, Expr::Constant(c) if c.value == Constant::Bool(true))
    });
    if !shell_enabled {
        return None;
    }
    Some(
        Diagnostic::security(
            line,
            format!("Use of subprocess.{attr}() with shell=True. Risk of shell injection."),
        )
        .with_remediation("Use a list of arguments and shell=False."),
    )
}

/// `pickle.load(...)` / `pickle.loads(...)`.
pub fn unsafe_deserialization(call: &ast::ExprCall, line: usize) -> Option<Diagnostic> {
    let (module, attr) = attribute_call(call)?;
    if module != "pickle" || !matches!(attr, "load" | "loads") {
        return None;
    }
    Some(
        Diagnostic::security(
            line,
            format!("Use of pickle.{attr}(). Untrusted pickle data can lead to RCE."),
        )
        .with_remediation("Use json or verify signature before unpickling."),
    )
}

/// `yaml.load(...)` without `Loader=yaml.SafeLoader`.
pub fn unsafe_yaml_load(call: &ast::ExprCall, line: usize) -> Option<Diagnostic> {
    let (module, attr) = attribute_call(call)?;
    if module != "yaml" || attr != "load" {
        return None;
    }
    let has_safe_loader = call.keywords.iter().any(|kw| {
        kw.arg.as_ref().map(|arg| arg.as_str()) == Some("Loader")
            && matches!(&kw.value, Expr::Attribute(a) if a.attr.as_str() == "SafeLoader")
    });
    if has_safe_loader {
        return None;
    }
    Some(
        Diagnostic::security(
            line,
            "Use of yaml.load() without SafeLoader. \
             Unsafe YAML loading can lead to code execution.",
        )
        .with_remediation("Use yaml.safe_load() or specify Loader=yaml.SafeLoader."),
    )
}

/// Single-target assignment of a string literal to a secret-looking name.
pub fn hardcoded_secret(assign: &ast::StmtAssign, line: usize) -> Option<Diagnostic> {
    let [target] = assign.targets.as_slice() else {
        return None;
    };
    let Expr::Name(name) = target else {
        return None;
    };
    if !matches!(&*assign.value, Expr::Constant(c) if matches!(c.value, Constant::Str(_))) {
        return None;
    }
    let lowered = name.id.as_str().to_lowercase();
    if !SECRET_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return None;
    }
    Some(
        Diagnostic::security(
            line,
            format!(
                "Assignment to '{}' with a literal string. Hard-coded secret detected.",
                name.id.as_str()
            ),
        )
        .with_remediation("Store secrets in environment variables or a secrets manager."),
    )
}

/// Attribute access `hashlib.md5` / `hashlib.sha1`.
pub fn weak_hash(attribute: &ast::ExprAttribute, line: usize) -> Option<Diagnostic> {
    let Expr::Name(base) = &*attribute.value else {
        return None;
    };
    let algorithm = attribute.attr.as_str();
    if base.id.as_str() != "hashlib" || !matches!(algorithm, "md5" | "sha1") {
        return None;
    }
    Some(
        Diagnostic::security(
            line,
            format!(
                "Use of hashlib.{algorithm}(). {} is considered weak.",
                algorithm.to_uppercase()
            ),
        )
        .with_remediation("Use hashlib.sha256 or stronger."),
    )
}

fn call_name(call: &ast::ExprCall) -> Option<&str> {
    match &*call.func {
        Expr::Name(name) => Some(name.id.as_str()),
        _ => None,
    }
}

/// `<module>.<attr>(...)` where the receiver is a plain name.
fn attribute_call(call: &ast::ExprCall) -> Option<(&str, &str)> {
    let Expr::Attribute(attribute) = &*call.func else {
        return None;
    };
    let Expr::Name(base) = &*attribute.value else {
        return None;
    };
    Some((base.id.as_str(), attribute.attr.as_str()))
}

#[cfg(test)]
mod tests {
    use crate::analyze_source;

    fn rendered(source: &str) -> Vec<String> {
        analyze_source(source, "test.py")
            .unwrap()
            .diagnostics
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn flags_exec_and_eval() {
        let issues = rendered("exec('print(1)')\nx = eval('2 + 2')\n");
        assert_eq!(
            issues[0],
            "[Security][CVE-2025-3248] Line 1: Use of 'exec()' detected. \
             This can lead to code injection (e.g. CVE-2025-3248 in Langflow). \
             Consider safer alternatives (e.g., ast.literal_eval) or explicit parsing."
        );
        assert!(issues[1].contains("Use of 'eval()' detected"));
    }

    #[test]
    fn ignores_similarly_named_calls() {
        let issues = rendered("execute('SELECT 1')\nevaluate(2)\n");
        assert!(issues.iter().all(|msg| !msg.contains("CVE-2025-3248")));
    }

    #[test]
    fn flags_risky_import_forms() {
        let issues = rendered(
            "import python_json_logger\nfrom python_json_logger import jsonlogger\n",
        );
        assert!(issues[0].starts_with(
            "[Security][CVE-2025-27607] Line 1: 'python_json_logger' import detected."
        ));
        assert!(issues[1].starts_with(
            "[Security][CVE-2025-27607] Line 2: 'from python_json_logger import ...' detected."
        ));
    }

    #[test]
    fn flags_dotted_risky_import() {
        let issues = rendered("import python_json_logger.jsonlogger as j\nj.foo()\n");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("CVE-2025-27607"));
    }

    #[test]
    fn flags_subprocess_shell_true_only() {
        let flagged = rendered("import subprocess\nsubprocess.run('ls', shell=True)\n");
        assert!(flagged
            .iter()
            .any(|msg| msg == "[Security] Line 2: Use of subprocess.run() with shell=True. \
                 Risk of shell injection. Use a list of arguments and shell=False."));

        let clean = rendered("import subprocess\nsubprocess.run(['ls'], shell=False)\n");
        assert!(clean.iter().all(|msg| !msg.contains("shell=True")));
    }

    #[test]
    fn flags_pickle_loads() {
        let issues = rendered("import pickle\ndata = pickle.loads(blob)\n");
        assert!(issues.iter().any(|msg| msg
            == "[Security] Line 2: Use of pickle.loads(). Untrusted pickle data can lead to \
                RCE. Use json or verify signature before unpickling."));
    }

    #[test]
    fn flags_yaml_load_without_safe_loader() {
        let flagged = rendered("import yaml\ncfg = yaml.load(text)\n");
        assert!(flagged
            .iter()
            .any(|msg| msg.contains("Use of yaml.load() without SafeLoader")));

        let safe = rendered("import yaml\ncfg = yaml.load(text, Loader=yaml.SafeLoader)\n");
        assert!(safe
            .iter()
            .all(|msg| !msg.contains("Use of yaml.load() without SafeLoader")));

        let safe_load = rendered("import yaml\ncfg = yaml.safe_load(text)\n");
        assert!(safe_load
            .iter()
            .all(|msg| !msg.contains("Use of yaml.load() without SafeLoader")));
    }

    #[test]
    fn flags_hardcoded_secrets_case_insensitively() {
        let issues = rendered("API_KEY = 'abc123'\n");
        assert!(issues.iter().any(|msg| msg
            == "[Security] Line 1: Assignment to 'API_KEY' with a literal string. Hard-coded \
                secret detected. Store secrets in environment variables or a secrets manager."));
    }

    #[test]
    fn secret_rule_needs_string_literal_and_single_target() {
        let non_literal = rendered("password = read_password()\n");
        assert!(non_literal
            .iter()
            .all(|msg| !msg.contains("Hard-coded secret")));

        let multi_target = rendered("token = backup_token = 'abc'\n");
        assert!(multi_target
            .iter()
            .all(|msg| !msg.contains("Hard-coded secret")));
    }

    #[test]
    fn flags_weak_hash_attributes() {
        let issues = rendered("import hashlib\nh = hashlib.md5(data)\n");
        assert!(issues.iter().any(|msg| msg
            == "[Security] Line 2: Use of hashlib.md5(). MD5 is considered weak. \
                Use hashlib.sha256 or stronger."));

        let strong = rendered("import hashlib\nh = hashlib.sha256(data)\n");
        assert!(strong.iter().all(|msg| !msg.contains("considered weak")));
    }
}
