//! What the generator produces for one mocked type.
//!
//! The model is still structural: type names are text, but nothing is laid
//! out yet. `stubby-fmt` turns it into source.

use stubby_common::effect::EffectKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockExpansion {
    /// The mocked type.
    pub type_name: String,
    pub handle: HandleField,
    pub companion: CompanionDecl,
    /// Spelling of the empty argument list and of "no return value".
    pub unit_type: String,
}

/// `let mock = ServiceMock()`, added to the mocked type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleField {
    pub name: String,
    pub companion_type: String,
}

impl HandleField {
    pub fn render(&self) -> String {
        format!("let {} = {}()", self.name, self.companion_type)
    }
}

/// The nested companion type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionDecl {
    pub name: String,
    /// One per property and method, in declaration order.
    pub fields: Vec<CompanionField>,
    /// One per method, in declaration order.
    pub methods: Vec<DelegateMethod>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanionField {
    Recorder {
        name: String,
        variant: EffectKind,
        recorder_type: String,
        args: ArgsShape,
        returns: String,
    },
    Variable {
        name: String,
        variable_type: String,
        ty: String,
    },
}

impl CompanionField {
    pub fn name(&self) -> &str {
        match self {
            CompanionField::Recorder { name, .. } | CompanionField::Variable { name, .. } => name,
        }
    }

    /// The field's declared type, e.g. `Recorder<(Int, String), Bool>`.
    pub fn type_text(&self, unit: &str) -> String {
        match self {
            CompanionField::Recorder {
                recorder_type,
                args,
                returns,
                ..
            } => format!("{recorder_type}<{}, {returns}>", args.type_text(unit)),
            CompanionField::Variable {
                variable_type, ty, ..
            } => format!("{variable_type}<{ty}>"),
        }
    }

    /// `var name: Type = .init()`
    pub fn render(&self, unit: &str) -> String {
        format!("var {}: {} = .init()", self.name(), self.type_text(unit))
    }
}

/// How a method's arguments are packed into one recorded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsShape {
    /// No parameters.
    Unit,
    Single(String),
    /// Two or more, in declaration order.
    Tuple(Vec<String>),
}

impl ArgsShape {
    pub fn from_types(mut types: Vec<String>) -> Self {
        match types.len() {
            0 => ArgsShape::Unit,
            1 => ArgsShape::Single(types.remove(0)),
            _ => ArgsShape::Tuple(types),
        }
    }

    pub fn type_text(&self, unit: &str) -> String {
        match self {
            ArgsShape::Unit => unit.to_string(),
            ArgsShape::Single(ty) => ty.clone(),
            ArgsShape::Tuple(types) => format!("({})", types.join(", ")),
        }
    }
}

/// A companion method with the original signature whose body forwards to
/// its recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateMethod {
    pub name: String,
    pub signature_text: String,
    pub attributes: Vec<String>,
    pub modifiers: Vec<String>,
    pub call: DelegatingCall,
}

impl DelegateMethod {
    /// Attributes, modifiers and signature on one line, without the body.
    pub fn header(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        parts.extend(self.attributes.iter().map(String::as_str));
        parts.extend(self.modifiers.iter().map(String::as_str));
        parts.push(&self.signature_text);
        parts.join(" ")
    }
}

/// `[try] [await] <recorder>.record(<args>)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegatingCall {
    pub recorder: String,
    /// Argument bindings in declaration order.
    pub args: Vec<String>,
    pub try_marker: bool,
    pub await_marker: bool,
}

impl DelegatingCall {
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.try_marker {
            out.push_str("try ");
        }
        if self.await_marker {
            out.push_str("await ");
        }
        out.push_str(&self.recorder);
        out.push_str(".record(");
        match self.args.as_slice() {
            [] => {}
            [single] => out.push_str(single),
            many => {
                out.push('(');
                out.push_str(&many.join(", "));
                out.push(')');
            }
        }
        out.push(')');
        out
    }
}
