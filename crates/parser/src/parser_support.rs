use smallvec::SmallVec;

use crate::ast::{self, FieldId, IdentName, ListRef, Span};
use crate::error::Diag;

/// One comma-separated entry of a parameter list as written, before the
/// grouping of `a, b int` style names onto their type is known.
///
/// A lone identifier is ambiguous: it is a parameter name if some other
/// entry of the list has both a name and a type, and a type otherwise.
#[derive(Clone, Debug)]
pub struct ParamDecl {
    pub name: Option<IdentName>,
    pub typ: Option<ast::TypeId>,
    pub span: Span,
}

impl ParamDecl {
    pub fn bare(name: IdentName) -> Self {
        Self {
            name: Some(name),
            typ: None,
            span: name.pos,
        }
    }
}

/// Turns raw entries into fields.
///
/// Named lists attach every run of bare names to the next typed entry;
/// unnamed lists turn bare names into type names. Mixing the two forms is
/// a syntax error.
pub fn resolve_param_list(
    arena: &mut ast::AstArena,
    params: Vec<ParamDecl>,
) -> Result<ListRef<FieldId>, Diag> {
    let named = params.iter().any(|p| p.name.is_some() && p.typ.is_some());
    let mut out = Vec::with_capacity(params.len());

    if !named {
        for param in params {
            let typ = match (param.typ, param.name) {
                (Some(typ), _) => typ,
                (None, Some(name)) => named_type_from_ident(arena, name),
                (None, None) => return Err(Diag::parse(param.span, "expected parameter")),
            };
            let field = ast::Field {
                names: ListRef::EMPTY,
                typ,
                tag: None,
            };
            out.push(arena.fields.alloc(field, param.span));
        }
        return Ok(arena.list_fields(out));
    }

    let mut pending: SmallVec<[IdentName; 4]> = SmallVec::new();
    let mut pending_start = None;
    for param in params {
        match (param.name, param.typ) {
            (Some(name), None) => {
                pending_start.get_or_insert(param.span.start);
                pending.push(name);
            }
            (Some(name), Some(typ)) => {
                pending.push(name);
                let names = arena.list_ident_names(pending.drain(..));
                let start = pending_start.take().unwrap_or(param.span.start);
                let span = Span {
                    start,
                    end: param.span.end,
                };
                let field = ast::Field {
                    names,
                    typ,
                    tag: None,
                };
                out.push(arena.fields.alloc(field, span));
            }
            (None, _) => {
                return Err(Diag::parse(param.span, "mixed named and unnamed parameters"));
            }
        }
    }
    if let Some(last) = pending.last() {
        return Err(Diag::parse(last.pos, "mixed named and unnamed parameters"));
    }
    Ok(arena.list_fields(out))
}

pub fn named_type_from_ident(arena: &mut ast::AstArena, name: IdentName) -> ast::TypeId {
    arena.types.alloc(
        ast::Type::Name {
            pkg: None,
            name,
            args: None,
        },
        name.pos,
    )
}
