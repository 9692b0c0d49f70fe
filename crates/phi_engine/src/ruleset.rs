//! Loading and compiling rulesets from their declarative YAML source.

use phi_ast::{Attribute, Binding, MetaId, Term};
use phi_parser::{parse, parse_program};
use serde::Deserialize;
use std::collections::HashSet;

use crate::error::RulesetError;
use crate::rule::{Condition, Rule, RuleContext, RuleTest};
use crate::substitute::meta_function;

/// An ordered collection of compiled rewrite rules.
#[derive(Debug, Clone)]
pub struct Ruleset {
    pub title: String,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Deserialize)]
struct RulesetFile {
    #[serde(default)]
    title: String,
    rules: Vec<RuleFile>,
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    context: Option<ContextFile>,
    pattern: String,
    result: String,
    #[serde(default)]
    when: Vec<WhenFile>,
    #[serde(default)]
    tests: Vec<TestFile>,
}

#[derive(Debug, Deserialize)]
struct ContextFile {
    #[serde(rename = "global-object")]
    global_object: Option<String>,
    #[serde(rename = "current-object")]
    current_object: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WhenFile {
    #[serde(default)]
    nf: Option<Vec<String>>,
    #[serde(default)]
    present_attrs: Option<AttrsFile>,
    #[serde(default)]
    absent_attrs: Option<AttrsFile>,
}

#[derive(Debug, Deserialize)]
struct AttrsFile {
    attrs: Vec<String>,
    bindings: String,
}

#[derive(Debug, Deserialize)]
struct TestFile {
    name: String,
    input: String,
    #[serde(default)]
    output: Option<String>,
    #[serde(default = "default_true")]
    matches: bool,
}

fn default_true() -> bool {
    true
}

/// Meta-variables a term mentions, split by kind.
#[derive(Debug, Default)]
struct MetaSets {
    objects: HashSet<String>,
    attributes: HashSet<String>,
    bindings: HashSet<String>,
    functions: Vec<String>,
}

fn collect_metas(term: &Term, sets: &mut MetaSets) {
    match term {
        Term::MetaObject(id) => {
            sets.objects.insert(id.0.clone());
        }
        Term::MetaFunction(name, arg) => {
            sets.functions.push(name.clone());
            collect_metas(arg, sets);
        }
        Term::Formation(bs) => collect_binding_metas(bs, sets),
        Term::Application(f, bs) => {
            collect_metas(f, sets);
            collect_binding_metas(bs, sets);
        }
        Term::Dispatch(o, a) => {
            collect_metas(o, sets);
            collect_attr_meta(a, sets);
        }
        Term::Global | Term::This | Term::Termination => {}
    }
}

fn collect_binding_metas(bindings: &[Binding], sets: &mut MetaSets) {
    for b in bindings {
        match b {
            Binding::Alpha(a, t) => {
                collect_attr_meta(a, sets);
                collect_metas(t, sets);
            }
            Binding::Empty(a) => collect_attr_meta(a, sets),
            Binding::MetaBindings(id) => {
                sets.bindings.insert(id.0.clone());
            }
            Binding::Delta(_) | Binding::Lambda(_) => {}
        }
    }
}

fn collect_attr_meta(attr: &Attribute, sets: &mut MetaSets) {
    if let Attribute::Meta(id) = attr {
        sets.attributes.insert(id.0.clone());
    }
}

fn meta_id(raw: &str) -> MetaId {
    MetaId::new(raw.strip_prefix('!').unwrap_or(raw))
}

fn condition_attr(rule: &str, raw: &str) -> Result<Attribute, RulesetError> {
    let attr = match raw {
        "φ" => Attribute::Phi,
        "ρ" => Attribute::Rho,
        "σ" => Attribute::Sigma,
        "ν" => Attribute::Vertex,
        _ => {
            if let Some(meta) = raw.strip_prefix('!') {
                Attribute::Meta(MetaId::new(meta))
            } else if let Some(digits) = raw.strip_prefix('α') {
                let i = digits.parse::<u32>().map_err(|_| RulesetError::BadAttribute {
                    rule: rule.to_string(),
                    attr: raw.to_string(),
                })?;
                Attribute::Alpha(i)
            } else if !raw.is_empty()
                && raw
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                Attribute::label(raw)
            } else {
                return Err(RulesetError::BadAttribute {
                    rule: rule.to_string(),
                    attr: raw.to_string(),
                });
            }
        }
    };
    Ok(attr)
}

impl Ruleset {
    /// Parse and compile a ruleset from YAML source.
    pub fn from_yaml(src: &str) -> Result<Ruleset, RulesetError> {
        let file: RulesetFile = serde_yaml::from_str(src)?;
        let mut rules = Vec::with_capacity(file.rules.len());
        for rf in file.rules {
            rules.push(compile_rule(rf)?);
        }
        Ok(Ruleset {
            title: file.title,
            rules,
        })
    }

    /// Every test vector carried by the rules, paired with its rule name.
    pub fn rule_tests(&self) -> impl Iterator<Item = (&Rule, &RuleTest)> {
        self.rules
            .iter()
            .flat_map(|r| r.tests.iter().map(move |t| (r, t)))
    }
}

fn parse_field(rule: &str, field: &'static str, src: &str) -> Result<Term, RulesetError> {
    parse(src).map_err(|source| RulesetError::Phi {
        rule: rule.to_string(),
        field,
        source,
    })
}

fn compile_rule(rf: RuleFile) -> Result<Rule, RulesetError> {
    let name = rf.name;

    let pattern = parse_field(&name, "pattern", &rf.pattern)?;
    let result = parse_field(&name, "result", &rf.result)?;

    let mut bound = MetaSets::default();
    collect_metas(&pattern, &mut bound);
    if !bound.functions.is_empty() {
        return Err(RulesetError::MetaFunctionInPattern { rule: name });
    }

    let context = match rf.context {
        Some(cf) => RuleContext {
            global_object: cf.global_object.as_deref().map(meta_id),
            current_object: cf.current_object.as_deref().map(meta_id),
        },
        None => RuleContext::default(),
    };
    // Context meta-variables count as bound objects.
    for id in [&context.global_object, &context.current_object]
        .into_iter()
        .flatten()
    {
        bound.objects.insert(id.0.clone());
    }

    let mut used = MetaSets::default();
    collect_metas(&result, &mut used);
    check_bound(&name, "result", &bound, &used)?;
    for f in &used.functions {
        if meta_function(f).is_none() {
            return Err(RulesetError::UnknownMetaFunction {
                rule: name,
                name: f.clone(),
            });
        }
    }

    let mut when = Vec::with_capacity(rf.when.len());
    for wf in rf.when {
        when.push(compile_condition(&name, &bound, wf)?);
    }

    let mut tests = Vec::with_capacity(rf.tests.len());
    for tf in rf.tests {
        let input = parse_program(&tf.input)
            .map_err(|source| RulesetError::Phi {
                rule: name.clone(),
                field: "test input",
                source,
            })?
            .into_term();
        let output = match tf.output {
            Some(src) => Some(
                parse_program(&src)
                    .map_err(|source| RulesetError::Phi {
                        rule: name.clone(),
                        field: "test output",
                        source,
                    })?
                    .into_term(),
            ),
            None => None,
        };
        if !input.is_concrete() || output.as_ref().is_some_and(|t| !t.is_concrete()) {
            return Err(RulesetError::MetaInTestVector {
                rule: name,
                test: tf.name,
            });
        }
        tests.push(RuleTest {
            name: tf.name,
            input,
            output,
            matches: tf.matches,
        });
    }

    Ok(Rule {
        name,
        description: rf.description,
        context,
        pattern,
        result,
        when,
        tests,
    })
}

fn check_bound(
    rule: &str,
    place: &'static str,
    bound: &MetaSets,
    used: &MetaSets,
) -> Result<(), RulesetError> {
    let unbound = |var: &String| RulesetError::UnboundMeta {
        rule: rule.to_string(),
        var: var.clone(),
        place,
    };
    for v in &used.objects {
        if !bound.objects.contains(v) {
            return Err(unbound(v));
        }
    }
    for v in &used.attributes {
        if !bound.attributes.contains(v) {
            return Err(unbound(v));
        }
    }
    for v in &used.bindings {
        if !bound.bindings.contains(v) {
            return Err(unbound(v));
        }
    }
    Ok(())
}

fn compile_condition(
    rule: &str,
    bound: &MetaSets,
    wf: WhenFile,
) -> Result<Condition, RulesetError> {
    match (wf.nf, wf.present_attrs, wf.absent_attrs) {
        (Some(vars), None, None) => {
            let ids: Vec<MetaId> = vars.iter().map(|v| meta_id(v)).collect();
            for id in &ids {
                if !bound.objects.contains(&id.0) {
                    return Err(RulesetError::MalformedNf {
                        rule: rule.to_string(),
                        var: id.0.clone(),
                    });
                }
            }
            Ok(Condition::Nf(ids))
        }
        (None, Some(af), None) => compile_attrs(rule, bound, af, true),
        (None, None, Some(af)) => compile_attrs(rule, bound, af, false),
        _ => Err(RulesetError::MalformedCondition {
            rule: rule.to_string(),
        }),
    }
}

fn compile_attrs(
    rule: &str,
    bound: &MetaSets,
    af: AttrsFile,
    present: bool,
) -> Result<Condition, RulesetError> {
    let bindings = meta_id(&af.bindings);
    if !bound.bindings.contains(&bindings.0) {
        return Err(RulesetError::UnboundMeta {
            rule: rule.to_string(),
            var: bindings.0,
            place: "when",
        });
    }
    let mut attrs = Vec::with_capacity(af.attrs.len());
    for raw in &af.attrs {
        let attr = condition_attr(rule, raw)?;
        if let Attribute::Meta(id) = &attr {
            if !bound.attributes.contains(&id.0) {
                return Err(RulesetError::UnboundMeta {
                    rule: rule.to_string(),
                    var: id.0.clone(),
                    place: "when",
                });
            }
        }
        attrs.push(attr);
    }
    Ok(if present {
        Condition::PresentAttrs { attrs, bindings }
    } else {
        Condition::AbsentAttrs { attrs, bindings }
    })
}
