//! Shared models and Turtle fixtures for the integration tests

#![allow(dead_code)]

use anyhow::{bail, Context};
use rdf_bean_mapper::bean::{
    BeanDescriptor, Field, FieldValue, Instance, InstanceId, ObjectGraph, TypeRegistry, XsdType,
};
use rdf_bean_mapper::mapper::{
    expect_bean, nested_bean, nested_beans, FieldSerializer, MappingResult, RdfBean, RdfMapper,
    SerializerContext,
};
use rdf_bean_mapper::rdf::vocab::xsd;
use rdf_bean_mapper::rdf::{
    Literal, NamedNode, Quad, QuadStore, RdfObject, RdfPredicate, RdfSubject,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
pub const PERSON: &str = "http://example.com/Person/";
pub const ADDRESS: &str = "http://xmlns.com/foaf/0.1/address/";
pub const SCHEMA: &str = "http://schema.org/";
pub const QA: &str = "http://example.com/qa/";
pub const USER_ADDRESS: &str = "http://example.com/Address/";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn mapper_for<T: RdfBean + 'static>() -> RdfMapper {
    let mut registry = TypeRegistry::new();
    registry.register_bean::<T>().unwrap();
    registry.validate().unwrap();
    RdfMapper::new(registry)
}

/// Replace blank node labels by their order of first appearance
pub fn canonical(quads: &[Quad]) -> Vec<String> {
    let mut labels: HashMap<String, String> = HashMap::new();
    let mut rename = |label: &str| -> String {
        let next = labels.len();
        labels
            .entry(label.to_string())
            .or_insert_with(|| format!("_:c{}", next))
            .clone()
    };
    quads
        .iter()
        .map(|quad| {
            let subject = match &quad.subject {
                RdfSubject::BlankNode(b) => rename(b.as_str()),
                other => other.to_string(),
            };
            let object = match &quad.object {
                RdfObject::BlankNode(b) => rename(b.as_str()),
                other => other.to_string(),
            };
            format!("{} {} {}", subject, quad.predicate, object)
        })
        .collect()
}

// Scenario A: flat person

pub const PERSON_TTL: &str = r#"
@prefix foaf: <http://xmlns.com/foaf/0.1/> .
@prefix person: <http://example.com/Person/> .

person:1234567 a foaf:Person ;
    foaf:firstName "David" ;
    foaf:givenName "Banner" ;
    foaf:name "David Banner" ;
    foaf:nick "hulk" ;
    foaf:title "Mr" .
"#;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub uuid: Option<String>,
    pub first_name: Option<String>,
    pub surname: Option<String>,
    pub name: Option<String>,
    pub nick: Option<String>,
    pub title: Option<String>,
}

impl RdfBean for Person {
    fn descriptor() -> MappingResult<BeanDescriptor> {
        BeanDescriptor::builder("Person")
            .namespace("foaf", FOAF)
            .namespace("person", PERSON)
            .rdf_type("foaf:Person")
            .subject("person", "uuid")
            .field(Field::scalar("firstName", "foaf:firstName", XsdType::String))
            .field(Field::scalar("surname", "foaf:givenName", XsdType::String))
            .field(Field::scalar("name", "foaf:name", XsdType::String))
            .field(Field::scalar("nick", "foaf:nick", XsdType::String))
            .field(Field::scalar("title", "foaf:title", XsdType::String))
            .build()
    }

    fn from_instance(graph: &ObjectGraph, id: InstanceId) -> MappingResult<Self> {
        expect_bean(graph, id, "Person")?;
        let instance = graph.instance(id)?;
        Ok(Person {
            uuid: instance.get_string("uuid"),
            first_name: instance.get_string("firstName"),
            surname: instance.get_string("surname"),
            name: instance.get_string("name"),
            nick: instance.get_string("nick"),
            title: instance.get_string("title"),
        })
    }

    fn to_instance(&self, graph: &mut ObjectGraph) -> MappingResult<InstanceId> {
        Ok(graph.add(
            Instance::new("Person")
                .with_opt("uuid", self.uuid.clone())
                .with_opt("firstName", self.first_name.clone())
                .with_opt("surname", self.surname.clone())
                .with_opt("name", self.name.clone())
                .with_opt("nick", self.nick.clone())
                .with_opt("title", self.title.clone()),
        ))
    }
}

// Scenario B: one-to-one relationship

pub const ONE_TO_ONE_TTL: &str = r#"
@prefix foaf: <http://xmlns.com/foaf/0.1/> .
@prefix person: <http://example.com/Person/> .
@prefix address: <http://xmlns.com/foaf/0.1/address/> .

person:person-uuid a foaf:Person ;
    foaf:name "John" ;
    person:hasAddress address:address-uuid .

address:address-uuid a foaf:Address ;
    address:streetName "Jasmine" .
"#;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub uuid: Option<String>,
    pub street_name: Option<String>,
}

impl RdfBean for Address {
    fn descriptor() -> MappingResult<BeanDescriptor> {
        BeanDescriptor::builder("Address")
            .namespace("foaf", FOAF)
            .namespace("address", ADDRESS)
            .rdf_type("foaf:Address")
            .subject(ADDRESS, "uuid")
            .field(Field::scalar("streetName", "address:streetName", XsdType::String).required())
            .build()
    }

    fn from_instance(graph: &ObjectGraph, id: InstanceId) -> MappingResult<Self> {
        let instance = graph.instance(id)?;
        Ok(Address {
            uuid: instance.get_string("uuid"),
            street_name: instance.get_string("streetName"),
        })
    }

    fn to_instance(&self, graph: &mut ObjectGraph) -> MappingResult<InstanceId> {
        Ok(graph.add(
            Instance::new("Address")
                .with_opt("uuid", self.uuid.clone())
                .with_opt("streetName", self.street_name.clone()),
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonHasAddress {
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub address: Option<Address>,
}

impl RdfBean for PersonHasAddress {
    fn descriptor() -> MappingResult<BeanDescriptor> {
        BeanDescriptor::builder("PersonHasAddress")
            .namespace("foaf", FOAF)
            .namespace("person", PERSON)
            .rdf_type("foaf:Person")
            .subject("person", "uuid")
            .field(Field::scalar("name", "foaf:name", XsdType::String))
            .field(Field::nested("address", "person:hasAddress", "Address"))
            .build()
    }

    fn register_dependencies(registry: &mut TypeRegistry) -> MappingResult<()> {
        registry.register_bean::<Address>()
    }

    fn from_instance(graph: &ObjectGraph, id: InstanceId) -> MappingResult<Self> {
        let instance = graph.instance(id)?;
        Ok(PersonHasAddress {
            uuid: instance.get_string("uuid"),
            name: instance.get_string("name"),
            address: nested_bean(graph, instance.get_object("address"))?,
        })
    }

    fn to_instance(&self, graph: &mut ObjectGraph) -> MappingResult<InstanceId> {
        let address = self
            .address
            .as_ref()
            .map(|address| address.to_instance(graph))
            .transpose()?;
        Ok(graph.add(
            Instance::new("PersonHasAddress")
                .with_opt("uuid", self.uuid.clone())
                .with_opt("name", self.name.clone())
                .with_opt("address", address),
        ))
    }
}

// Scenario C: blank node object

pub const RECIPE_TTL: &str = r#"
@prefix schema: <http://schema.org/> .
@prefix recipe: <http://example.com/recipe/> .

recipe:cheesecake a schema:Recipe ;
    schema:recipeName "Cheesecake" ;
    schema:video [
        a schema:VideoObject ;
        schema:name "Japanese Cheesecake instructions" ;
        schema:description "Watch how to make a jiggly cheesecake"
    ] .
"#;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Video {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl RdfBean for Video {
    fn descriptor() -> MappingResult<BeanDescriptor> {
        BeanDescriptor::builder("Video")
            .namespace("schema", SCHEMA)
            .rdf_type("schema:VideoObject")
            .field(Field::scalar("name", "schema:name", XsdType::String))
            .field(Field::scalar("description", "schema:description", XsdType::String))
            .build()
    }

    fn from_instance(graph: &ObjectGraph, id: InstanceId) -> MappingResult<Self> {
        expect_bean(graph, id, "Video")?;
        let instance = graph.instance(id)?;
        Ok(Video {
            name: instance.get_string("name"),
            description: instance.get_string("description"),
        })
    }

    fn to_instance(&self, graph: &mut ObjectGraph) -> MappingResult<InstanceId> {
        Ok(graph.add(
            Instance::new("Video")
                .with_opt("name", self.name.clone())
                .with_opt("description", self.description.clone()),
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recipe {
    pub id: Option<String>,
    pub recipe_name: Option<String>,
    pub video: Option<Video>,
}

impl RdfBean for Recipe {
    fn descriptor() -> MappingResult<BeanDescriptor> {
        BeanDescriptor::builder("Recipe")
            .namespace("schema", SCHEMA)
            .namespace("recipe", "http://example.com/recipe/")
            .rdf_type("schema:Recipe")
            .subject("recipe", "id")
            .field(Field::scalar("recipeName", "schema:recipeName", XsdType::String))
            .field(Field::nested("video", "schema:video", "Video"))
            .build()
    }

    fn register_dependencies(registry: &mut TypeRegistry) -> MappingResult<()> {
        registry.register_bean::<Video>()
    }

    fn from_instance(graph: &ObjectGraph, id: InstanceId) -> MappingResult<Self> {
        expect_bean(graph, id, "Recipe")?;
        let instance = graph.instance(id)?;
        Ok(Recipe {
            id: instance.get_string("id"),
            recipe_name: instance.get_string("recipeName"),
            video: nested_bean(graph, instance.get_object("video"))?,
        })
    }

    fn to_instance(&self, graph: &mut ObjectGraph) -> MappingResult<InstanceId> {
        let video = self
            .video
            .as_ref()
            .map(|video| video.to_instance(graph))
            .transpose()?;
        Ok(graph.add(
            Instance::new("Recipe")
                .with_opt("id", self.id.clone())
                .with_opt("recipeName", self.recipe_name.clone())
                .with_opt("video", video),
        ))
    }
}

// Scenario D: recursive template
//
// The child elements are listed in reverse order on purpose.

pub const TEMPLATE_TTL: &str = r#"
@prefix qa: <http://example.com/qa/> .
@prefix template: <http://example.com/template/> .
@prefix element: <http://example.com/element/> .

element:patient-information-1 a qa:TemplateElement ;
    qa:index 1 ;
    qa:label "Medical history" ;
    qa:tag "history" .

template:intake a qa:Template ;
    qa:name "Patient intake" ;
    qa:patientInformation element:patient-information .

element:patient-information a qa:TemplateElement ;
    qa:index 0 ;
    qa:label "Patient information" ;
    qa:tag "patient-information" ;
    qa:element element:patient-information-1 , element:patient-information-0 .

element:patient-information-0 a qa:TemplateElement ;
    qa:index 0 ;
    qa:label "Demographics" ;
    qa:tag "demographics" .
"#;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QaTemplateElement {
    pub uuid: Option<String>,
    pub index: Option<i64>,
    pub label: Option<String>,
    pub tag: Option<String>,
    pub elements: Vec<QaTemplateElement>,
}

impl RdfBean for QaTemplateElement {
    fn descriptor() -> MappingResult<BeanDescriptor> {
        BeanDescriptor::builder("QaTemplateElement")
            .namespace("qa", QA)
            .namespace("element", "http://example.com/element/")
            .rdf_type("qa:TemplateElement")
            .subject("element", "uuid")
            .field(Field::scalar("index", "qa:index", XsdType::Integer))
            .field(Field::scalar("label", "qa:label", XsdType::String))
            .field(Field::scalar("tag", "qa:tag", XsdType::String))
            .field(Field::nested("elements", "qa:element", "QaTemplateElement").many())
            .build()
    }

    fn from_instance(graph: &ObjectGraph, id: InstanceId) -> MappingResult<Self> {
        expect_bean(graph, id, "QaTemplateElement")?;
        let instance = graph.instance(id)?;
        Ok(QaTemplateElement {
            uuid: instance.get_string("uuid"),
            index: instance.get_integer("index"),
            label: instance.get_string("label"),
            tag: instance.get_string("tag"),
            elements: nested_beans(graph, &instance.get_objects("elements"))?,
        })
    }

    fn to_instance(&self, graph: &mut ObjectGraph) -> MappingResult<InstanceId> {
        let mut elements = Vec::with_capacity(self.elements.len());
        for element in &self.elements {
            elements.push(FieldValue::Object(element.to_instance(graph)?));
        }
        let elements = (!elements.is_empty()).then_some(elements);
        Ok(graph.add(
            Instance::new("QaTemplateElement")
                .with_opt("uuid", self.uuid.clone())
                .with_opt("index", self.index)
                .with_opt("label", self.label.clone())
                .with_opt("tag", self.tag.clone())
                .with_opt("elements", elements),
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QaTemplate {
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub patient_information: Option<QaTemplateElement>,
}

impl RdfBean for QaTemplate {
    fn descriptor() -> MappingResult<BeanDescriptor> {
        BeanDescriptor::builder("QaTemplate")
            .namespace("qa", QA)
            .namespace("template", "http://example.com/template/")
            .rdf_type("qa:Template")
            .subject("template", "uuid")
            .field(Field::scalar("name", "qa:name", XsdType::String))
            .field(Field::nested(
                "patientInformation",
                "qa:patientInformation",
                "QaTemplateElement",
            ))
            .build()
    }

    fn register_dependencies(registry: &mut TypeRegistry) -> MappingResult<()> {
        registry.register_bean::<QaTemplateElement>()
    }

    fn from_instance(graph: &ObjectGraph, id: InstanceId) -> MappingResult<Self> {
        expect_bean(graph, id, "QaTemplate")?;
        let instance = graph.instance(id)?;
        Ok(QaTemplate {
            uuid: instance.get_string("uuid"),
            name: instance.get_string("name"),
            patient_information: nested_bean(graph, instance.get_object("patientInformation"))?,
        })
    }

    fn to_instance(&self, graph: &mut ObjectGraph) -> MappingResult<InstanceId> {
        let patient_information = self
            .patient_information
            .as_ref()
            .map(|element| element.to_instance(graph))
            .transpose()?;
        Ok(graph.add(
            Instance::new("QaTemplate")
                .with_opt("uuid", self.uuid.clone())
                .with_opt("name", self.name.clone())
                .with_opt("patientInformation", patient_information),
        ))
    }
}

// Cyclic data, arena API only

pub const FRIENDS_TTL: &str = r#"
@prefix foaf: <http://xmlns.com/foaf/0.1/> .
@prefix person: <http://example.com/Person/> .

person:alice a foaf:Person ;
    foaf:name "Alice" ;
    foaf:knows person:bob .

person:bob a foaf:Person ;
    foaf:name "Bob" ;
    foaf:knows person:alice .
"#;

pub fn friend_descriptor() -> BeanDescriptor {
    BeanDescriptor::builder("Friend")
        .namespace("foaf", FOAF)
        .namespace("person", PERSON)
        .rdf_type("foaf:Person")
        .subject("person", "uuid")
        .field(Field::scalar("name", "foaf:name", XsdType::String))
        .field(Field::nested("knows", "foaf:knows", "Friend").many())
        .build()
        .unwrap()
}

// Custom field serializer

/// Writes a JSON address object as a blank node with one literal per key
pub struct AddressSerializer;

impl FieldSerializer for AddressSerializer {
    fn serialize(
        &self,
        value: &FieldValue,
        ctx: &mut SerializerContext<'_>,
    ) -> anyhow::Result<Vec<Quad>> {
        let address = value
            .as_raw()
            .and_then(Value::as_object)
            .context("address must be a JSON object")?;

        let node = ctx.mint_blank_node()?;
        let mut quads = vec![ctx.quad(ctx.subject().clone(), ctx.predicate().clone(), node.clone())];
        for (key, value) in address {
            let predicate = RdfPredicate::new(&format!("{}{}", USER_ADDRESS, key))?;
            let literal = match value {
                Value::String(s) => Literal::new_simple_literal(s.as_str()),
                Value::Bool(b) => Literal::new_typed_literal(b.to_string(), NamedNode::new(xsd::BOOLEAN)?),
                Value::Number(n) => match n.as_i64() {
                    Some(i) => Literal::new_typed_literal(i.to_string(), NamedNode::new(xsd::INTEGER)?),
                    None => bail!("address.{} is not an integer", key),
                },
                other => bail!("unsupported value for address.{}: {}", key, other),
            };
            quads.push(ctx.quad(node.clone(), predicate, literal));
        }
        Ok(quads)
    }

    fn deserialize(&self, store: &QuadStore, object: &RdfObject) -> anyhow::Result<Option<FieldValue>> {
        let subject = object.as_subject().context("address must be a resource")?;
        let mut address = Map::new();
        for quad in store.quads_with_subject(&subject) {
            let Some(key) = quad.predicate.as_str().strip_prefix(USER_ADDRESS) else {
                continue;
            };
            let Some(literal) = quad.object.as_literal() else {
                continue;
            };
            let value = match literal.datatype_iri() {
                xsd::BOOLEAN => Value::Bool(literal.value() == "true"),
                xsd::INTEGER => Value::from(literal.value().parse::<i64>()?),
                _ => Value::String(literal.value().to_string()),
            };
            address.insert(key.to_string(), value);
        }
        Ok(Some(FieldValue::Raw(Value::Object(address))))
    }
}

/// Always fails
pub struct FailingSerializer;

impl FieldSerializer for FailingSerializer {
    fn serialize(&self, _value: &FieldValue, _ctx: &mut SerializerContext<'_>) -> anyhow::Result<Vec<Quad>> {
        bail!("geocoding service unavailable")
    }
}

/// Emits a quad about a foreign named subject
pub struct RogueSerializer;

impl FieldSerializer for RogueSerializer {
    fn serialize(&self, _value: &FieldValue, ctx: &mut SerializerContext<'_>) -> anyhow::Result<Vec<Quad>> {
        let other = NamedNode::new("http://example.com/User/someone-else")?;
        Ok(vec![ctx.quad(other, ctx.predicate().clone(), Literal::new_simple_literal("x"))])
    }
}

pub fn user_descriptor(serializer: Arc<dyn FieldSerializer>) -> BeanDescriptor {
    BeanDescriptor::builder("UserJsonObject")
        .namespace("foaf", FOAF)
        .namespace("user", "http://example.com/User/")
        .rdf_type("foaf:User")
        .subject("user", "name")
        .field(Field::custom("address", "user:address", serializer))
        .build()
        .unwrap()
}

pub fn user_mapper(serializer: Arc<dyn FieldSerializer>) -> RdfMapper {
    let mut registry = TypeRegistry::new();
    registry.register(user_descriptor(serializer));
    RdfMapper::new(registry)
}
