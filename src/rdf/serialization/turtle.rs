//! rio parser and formatter adapters

use super::{ParseError, ParseResult, SerializeResult};
use crate::rdf::{BlankNode, Literal, NamedNode, Quad, RdfObject, RdfPredicate, RdfSubject};
use crate::rdf::vocab;
use oxiri::Iri;
use rio_api::formatter::{QuadsFormatter, TriplesFormatter};
use rio_api::model;
use rio_api::parser::{QuadsParser, TriplesParser};
use rio_turtle::{
    NQuadsFormatter, NQuadsParser, NTriplesFormatter, NTriplesParser, TriGParser,
    TurtleFormatter, TurtleParser,
};

fn base(base_iri: Option<&str>) -> ParseResult<Option<Iri<String>>> {
    base_iri
        .map(|iri| {
            Iri::parse(iri.to_string()).map_err(|e| ParseError::InvalidBase(e.to_string()))
        })
        .transpose()
}

pub(super) fn parse_turtle(input: &str, base_iri: Option<&str>) -> ParseResult<Vec<Quad>> {
    let mut parser = TurtleParser::new(input.as_bytes(), base(base_iri)?);
    collect_triples(&mut parser)
}

pub(super) fn parse_ntriples(input: &str) -> ParseResult<Vec<Quad>> {
    let mut parser = NTriplesParser::new(input.as_bytes());
    collect_triples(&mut parser)
}

pub(super) fn parse_nquads(input: &str) -> ParseResult<Vec<Quad>> {
    let mut parser = NQuadsParser::new(input.as_bytes());
    collect_quads(&mut parser)
}

pub(super) fn parse_trig(input: &str, base_iri: Option<&str>) -> ParseResult<Vec<Quad>> {
    let mut parser = TriGParser::new(input.as_bytes(), base(base_iri)?);
    collect_quads(&mut parser)
}

fn collect_triples<P>(parser: &mut P) -> ParseResult<Vec<Quad>>
where
    P: TriplesParser,
    ParseError: From<P::Error>,
{
    let mut quads = Vec::new();
    parser.parse_all(&mut |t| -> ParseResult<()> {
        quads.push(Quad::new(
            convert_subject(t.subject)?,
            convert_predicate(t.predicate)?,
            convert_object(t.object)?,
            None,
        ));
        Ok(())
    })?;
    Ok(quads)
}

fn collect_quads<P>(parser: &mut P) -> ParseResult<Vec<Quad>>
where
    P: QuadsParser,
    ParseError: From<P::Error>,
{
    let mut quads = Vec::new();
    parser.parse_all(&mut |q| -> ParseResult<()> {
        let graph = match q.graph_name {
            None => None,
            Some(model::GraphName::NamedNode(n)) => Some(named(n)?),
            Some(model::GraphName::BlankNode(b)) => {
                return Err(ParseError::Unsupported(format!("blank graph name _:{}", b.id)))
            }
        };
        quads.push(Quad::new(
            convert_subject(q.subject)?,
            convert_predicate(q.predicate)?,
            convert_object(q.object)?,
            graph,
        ));
        Ok(())
    })?;
    Ok(quads)
}

fn named(n: model::NamedNode<'_>) -> ParseResult<NamedNode> {
    NamedNode::new(n.iri).map_err(|e| ParseError::Unsupported(e.to_string()))
}

fn blank(b: model::BlankNode<'_>) -> ParseResult<BlankNode> {
    BlankNode::with_id(b.id).map_err(|e| ParseError::Unsupported(e.to_string()))
}

fn convert_subject(s: model::Subject<'_>) -> ParseResult<RdfSubject> {
    match s {
        model::Subject::NamedNode(n) => Ok(RdfSubject::NamedNode(named(n)?)),
        model::Subject::BlankNode(b) => Ok(RdfSubject::BlankNode(blank(b)?)),
        _ => Err(ParseError::Unsupported("quoted triple subject".to_string())),
    }
}

fn convert_predicate(p: model::NamedNode<'_>) -> ParseResult<RdfPredicate> {
    Ok(named(p)?.into())
}

fn convert_object(o: model::Term<'_>) -> ParseResult<RdfObject> {
    match o {
        model::Term::NamedNode(n) => Ok(RdfObject::NamedNode(named(n)?)),
        model::Term::BlankNode(b) => Ok(RdfObject::BlankNode(blank(b)?)),
        model::Term::Literal(l) => {
            let literal = match l {
                model::Literal::Simple { value } => Literal::new_simple_literal(value),
                model::Literal::LanguageTaggedString { value, language } => {
                    Literal::new_language_tagged_literal(value, language)
                        .map_err(|e| ParseError::Unsupported(e.to_string()))?
                }
                model::Literal::Typed { value, datatype } => {
                    Literal::new_typed_literal(value, named(datatype)?)
                }
            };
            Ok(RdfObject::Literal(literal))
        }
        _ => Err(ParseError::Unsupported("quoted triple object".to_string())),
    }
}

fn rio_subject(s: &RdfSubject) -> model::Subject<'_> {
    match s {
        RdfSubject::NamedNode(n) => model::Subject::NamedNode(model::NamedNode { iri: n.as_str() }),
        RdfSubject::BlankNode(b) => model::Subject::BlankNode(model::BlankNode { id: b.as_str() }),
    }
}

fn rio_object(o: &RdfObject) -> model::Term<'_> {
    match o {
        RdfObject::NamedNode(n) => model::Term::NamedNode(model::NamedNode { iri: n.as_str() }),
        RdfObject::BlankNode(b) => model::Term::BlankNode(model::BlankNode { id: b.as_str() }),
        RdfObject::Literal(l) => {
            let literal = if let Some(language) = l.language() {
                model::Literal::LanguageTaggedString {
                    value: l.value(),
                    language,
                }
            } else if l.datatype_iri() == vocab::xsd::STRING {
                model::Literal::Simple { value: l.value() }
            } else {
                model::Literal::Typed {
                    value: l.value(),
                    datatype: model::NamedNode {
                        iri: l.datatype_iri(),
                    },
                }
            };
            model::Term::Literal(literal)
        }
    }
}

fn rio_triple(quad: &Quad) -> model::Triple<'_> {
    model::Triple {
        subject: rio_subject(&quad.subject),
        predicate: model::NamedNode {
            iri: quad.predicate.as_str(),
        },
        object: rio_object(&quad.object),
    }
}

pub(super) fn format_turtle(quads: &[Quad]) -> SerializeResult<String> {
    let mut formatter = TurtleFormatter::new(Vec::new());
    for quad in quads {
        formatter.format(&rio_triple(quad))?;
    }
    let output = formatter.finish()?;
    Ok(String::from_utf8(output)?)
}

pub(super) fn format_ntriples(quads: &[Quad]) -> SerializeResult<String> {
    let mut output = Vec::new();
    {
        let mut formatter = NTriplesFormatter::new(&mut output);
        for quad in quads {
            formatter.format(&rio_triple(quad))?;
        }
    }
    Ok(String::from_utf8(output)?)
}

pub(super) fn format_nquads(quads: &[Quad]) -> SerializeResult<String> {
    let mut output = Vec::new();
    {
        let mut formatter = NQuadsFormatter::new(&mut output);
        for quad in quads {
            let triple = rio_triple(quad);
            let rio_quad = model::Quad {
                subject: triple.subject,
                predicate: triple.predicate,
                object: triple.object,
                graph_name: quad
                    .graph
                    .as_ref()
                    .map(|g| model::GraphName::NamedNode(model::NamedNode { iri: g.as_str() })),
            };
            formatter.format(&rio_quad)?;
        }
    }
    Ok(String::from_utf8(output)?)
}
