//! The generator proper: one mocked type in, one expansion out.

use rustc_hash::FxHashMap;
use stubby_common::span::Span;
use tracing::{debug, trace};

use crate::config::MockConfig;
use crate::decl::{MethodDecl, Member, PropertyDecl, TypeDecl};
use crate::error::{GenError, GenErrorKind};
use crate::expansion::{
    ArgsShape, CompanionDecl, CompanionField, DelegateMethod, DelegatingCall, HandleField,
    MockExpansion,
};

/// Modifiers that do not carry over to the companion's delegate methods.
const DROPPED_MODIFIERS: &[&str] = &["override", "mutating", "nonmutating"];

/// Build the companion for `decl`.
///
/// Fields follow declaration order; initializers, nested types and
/// type-level members are skipped. The first member that cannot be mocked
/// fails the whole type.
pub fn generate(decl: &TypeDecl, config: &MockConfig) -> Result<MockExpansion, GenError> {
    let companion_name = config.companion_name(&decl.name);
    let mut fields = Vec::new();
    let mut methods = Vec::new();
    let mut owners = FieldOwners::new(&config.handle_name);

    for member in &decl.members {
        match member {
            Member::Property(prop) => {
                let field = property_field(prop, config)?;
                owners.claim(&prop.name, &prop.name, prop.span)?;
                trace!(property = %prop.name, "companion variable");
                fields.push(field);
            }
            Member::Method(method) => {
                let (field, delegate) = method_field(method, config)?;
                owners.claim(field.name(), &method.name, method.span)?;
                trace!(method = %method.name, variant = %field_variant(&field), "companion recorder");
                fields.push(field);
                methods.push(delegate);
            }
            Member::Other(other) => {
                trace!(kind = ?other.kind, name = ?other.name, "skipped member");
            }
        }
    }

    debug!(
        companion = %companion_name,
        fields = fields.len(),
        methods = methods.len(),
        "generated companion"
    );

    Ok(MockExpansion {
        type_name: decl.name.clone(),
        handle: HandleField {
            name: config.handle_name.clone(),
            companion_type: companion_name.clone(),
        },
        companion: CompanionDecl {
            name: companion_name,
            fields,
            methods,
        },
        unit_type: config.unit_type.clone(),
    })
}

fn field_variant(field: &CompanionField) -> String {
    match field {
        CompanionField::Recorder { variant, .. } => variant.to_string(),
        CompanionField::Variable { .. } => "variable".to_string(),
    }
}

fn member_label(name: &str) -> &str {
    if name.is_empty() {
        "<unnamed>"
    } else {
        name
    }
}

fn property_field(prop: &PropertyDecl, config: &MockConfig) -> Result<CompanionField, GenError> {
    if prop.name.is_empty() {
        return Err(GenError::new(
            member_label(&prop.name),
            GenErrorKind::MissingMemberName,
            prop.span,
        ));
    }
    let Some(ty) = &prop.ty else {
        return Err(GenError::new(
            &prop.name,
            GenErrorKind::MissingPropertyType,
            prop.span,
        ));
    };
    Ok(CompanionField::Variable {
        name: prop.name.clone(),
        variable_type: config.variable_type.clone(),
        ty: stored_type(ty),
    })
}

fn method_field(
    method: &MethodDecl,
    config: &MockConfig,
) -> Result<(CompanionField, DelegateMethod), GenError> {
    if method.name.is_empty() {
        return Err(GenError::new(
            member_label(&method.name),
            GenErrorKind::MissingMemberName,
            method.span,
        ));
    }
    if !method.generic_params.is_empty() {
        return Err(GenError::new(
            &method.name,
            GenErrorKind::GenericMethod {
                params: method.generic_params.clone(),
            },
            method.span,
        ));
    }

    let mut arg_types = Vec::with_capacity(method.params.len());
    let mut bindings = Vec::with_capacity(method.params.len());
    for (index, param) in method.params.iter().enumerate() {
        let Some(ty) = &param.ty else {
            return Err(GenError::new(
                &method.name,
                GenErrorKind::MissingParamType { index },
                param.span,
            ));
        };
        let binding = match param.binding() {
            Some(name) if name != "_" => name,
            _ => {
                return Err(GenError::new(
                    &method.name,
                    GenErrorKind::MissingParamName { index },
                    param.span,
                ))
            }
        };
        arg_types.push(stored_type(ty));
        bindings.push(binding.to_string());
    }

    let variant = method.effects.kind();
    let recorder = config.calls_field(&method.name);
    let field = CompanionField::Recorder {
        name: recorder.clone(),
        variant,
        recorder_type: config.recorder_name(variant).to_string(),
        args: ArgsShape::from_types(arg_types),
        returns: method
            .return_type
            .as_deref()
            .map(stored_type)
            .unwrap_or_else(|| config.unit_type.clone()),
    };
    let delegate = DelegateMethod {
        name: method.name.clone(),
        signature_text: method.signature_text.clone(),
        attributes: method.attributes.clone(),
        modifiers: method
            .modifiers
            .iter()
            .filter(|m| !DROPPED_MODIFIERS.contains(&m.as_str()))
            .cloned()
            .collect(),
        call: DelegatingCall {
            recorder,
            args: bindings,
            try_marker: variant.is_failable(),
            await_marker: variant.is_async(),
        },
    };
    Ok((field, delegate))
}

/// The type a recorded value is stored as.
///
/// Parameter-only spellings have no meaning as a generic argument: type
/// attributes and `inout` are dropped, a variadic `T...` is stored as the
/// `[T]` the body sees, and an opaque `some P` becomes `any P`.
fn stored_type(ty: &str) -> String {
    let mut ty = ty.trim();
    loop {
        if let Some(rest) = ty.strip_prefix("inout ") {
            ty = rest.trim_start();
        } else if ty.starts_with('@') {
            match ty.split_once(' ') {
                Some((_, rest)) => ty = rest.trim_start(),
                None => break,
            }
        } else {
            break;
        }
    }
    let ty = match ty.strip_prefix("some ") {
        Some(rest) => format!("any {rest}"),
        None => ty.to_string(),
    };
    match ty.strip_suffix("...") {
        Some(element) => format!("[{element}]"),
        None => ty,
    }
}

/// Which member each generated field name belongs to.
struct FieldOwners<'a> {
    handle: &'a str,
    owners: FxHashMap<String, String>,
}

impl<'a> FieldOwners<'a> {
    fn new(handle: &'a str) -> Self {
        Self {
            handle,
            owners: FxHashMap::default(),
        }
    }

    fn claim(&mut self, field: &str, member: &str, span: Span) -> Result<(), GenError> {
        if member == self.handle {
            return Err(GenError::new(
                member,
                GenErrorKind::DuplicateField {
                    field: self.handle.to_string(),
                    first: format!("the `{}` handle", self.handle),
                },
                span,
            ));
        }
        if let Some(first) = self.owners.get(field) {
            return Err(GenError::new(
                member,
                GenErrorKind::DuplicateField {
                    field: field.to_string(),
                    first: first.clone(),
                },
                span,
            ));
        }
        self.owners.insert(field.to_string(), member.to_string());
        Ok(())
    }
}
