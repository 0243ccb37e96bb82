//! OpenAPI document generated from the routes and their shapes.
//!
//! Request and response schemas come from the same [`Shape`] declarations
//! that validate incoming requests.

use std::collections::BTreeMap;

use actix_web::{HttpResponse, web};
use utoipa::openapi::path::{HttpMethod, OperationBuilder, ParameterBuilder, ParameterIn};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::schema::{
    Array, KnownFormat, ObjectBuilder, OneOfBuilder, SchemaFormat, SchemaType, Type,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityRequirement, SecurityScheme};
use utoipa::openapi::tag::TagBuilder;
use utoipa::openapi::{
    ComponentsBuilder, ContentBuilder, InfoBuilder, OpenApi, OpenApiBuilder, Paths, Ref, RefOr,
    Required, ResponseBuilder, Schema,
};

use scribe_shared::{Field, Rule, Shape, shapes};

use crate::handlers;
use crate::routes::{Payload, RouteDoc, Verb};

/// Name of the bearer token security scheme.
pub const BEARER_AUTH: &str = "BearerAuth";

const JSON: &str = "application/json";

/// The document for every route the server exposes.
pub fn openapi() -> OpenApi {
    build(&handlers::route_docs())
}

/// GET /api-docs/openapi.json
pub async fn serve(doc: web::Data<OpenApi>) -> HttpResponse {
    HttpResponse::Ok().json(doc.get_ref())
}

/// Build the document for `routes`.
pub fn build(routes: &[RouteDoc]) -> OpenApi {
    let mut registry = Registry::default();
    for shape in shapes::COMPONENTS {
        registry.add(shape);
    }

    let mut paths = Paths::new();
    for route in routes {
        paths.add_path_operation(
            &route.path,
            vec![route.verb.into()],
            operation(route, &mut registry),
        );
    }

    let mut components = ComponentsBuilder::new()
        .schema("Violation", violation_schema())
        .schema("ErrorResponse", error_schema())
        .security_scheme(
            BEARER_AUTH,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token issued by the identity provider"))
                    .build(),
            ),
        );
    for shape in registry.shapes.values() {
        components = components.schema(shape.name, shape_schema(shape));
    }

    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title("Scribe API")
                .version(env!("CARGO_PKG_VERSION"))
                .description(Some(
                    "Blog posts scoped to their owner, authenticated by an external identity provider",
                ))
                .build(),
        )
        .paths(paths)
        .components(Some(components.build()))
        .tags(Some(tags(routes)))
        .build()
}

impl From<Verb> for HttpMethod {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => HttpMethod::Get,
            Verb::Post => HttpMethod::Post,
            Verb::Put => HttpMethod::Put,
            Verb::Delete => HttpMethod::Delete,
        }
    }
}

/// Shapes published under `components.schemas`, keyed by name.
#[derive(Default)]
struct Registry {
    shapes: BTreeMap<&'static str, &'static Shape>,
}

impl Registry {
    /// Register `shape` and every shape nested in it.
    fn add(&mut self, shape: &'static Shape) {
        if self.shapes.insert(shape.name, shape).is_some() {
            return;
        }
        for field in shape.fields {
            if let Rule::Object(nested) | Rule::List(nested) = field.rule {
                self.add(nested);
            }
        }
    }
}

fn operation(route: &RouteDoc, registry: &mut Registry) -> utoipa::openapi::path::Operation {
    let mut op = OperationBuilder::new()
        .tag(route.tag)
        .summary(Some(route.summary));

    if let Some(params) = route.params {
        for field in params.fields {
            op = op.parameter(
                ParameterBuilder::new()
                    .name(field.name)
                    .parameter_in(ParameterIn::Path)
                    .required(Required::True)
                    .description(field.description)
                    .schema(Some(field_schema(field)))
                    .build(),
            );
        }
    }

    if let Some(body) = route.body {
        registry.add(body);
        op = op.request_body(Some(
            RequestBodyBuilder::new()
                .content(
                    JSON,
                    ContentBuilder::new()
                        .schema(Some(Ref::from_schema_name(body.name)))
                        .build(),
                )
                .required(Some(Required::True))
                .build(),
        ));
    }

    let shape = match route.payload {
        Payload::One(shape) | Payload::Many(shape) => shape,
    };
    registry.add(shape);
    op = op.response(
        route.status.to_string(),
        ResponseBuilder::new()
            .description(route.summary)
            .content(
                JSON,
                ContentBuilder::new()
                    .schema(Some(success_schema(route)))
                    .build(),
            )
            .build(),
    );

    for status in error_statuses(route) {
        op = op.response(
            status.to_string(),
            ResponseBuilder::new()
                .description(error_description(status))
                .content(
                    JSON,
                    ContentBuilder::new()
                        .schema(Some(Ref::from_schema_name("ErrorResponse")))
                        .build(),
                )
                .build(),
        );
    }

    if route.secured {
        op = op.security(SecurityRequirement::new(BEARER_AUTH, Vec::<String>::new()));
    }

    op.build()
}

fn error_statuses(route: &RouteDoc) -> Vec<u16> {
    let mut statuses = Vec::new();
    if route.params.is_some() || route.body.is_some() {
        statuses.push(400);
    }
    if route.secured {
        statuses.push(401);
    }
    if route.params.is_some() {
        statuses.push(404);
    }
    statuses.extend_from_slice(route.errors);
    statuses.push(500);

    statuses.sort_unstable();
    statuses.dedup();
    statuses
}

fn error_description(status: u16) -> &'static str {
    match status {
        400 => "Validation error",
        401 => "Missing, invalid or expired credentials",
        403 => "Not allowed in this environment",
        404 => "Not found or not owned by the caller",
        409 => "Already exists",
        _ => "Internal server error",
    }
}

fn success_schema(route: &RouteDoc) -> RefOr<Schema> {
    let data = match route.payload {
        Payload::One(shape) => RefOr::Ref(Ref::from_schema_name(shape.name)),
        Payload::Many(shape) => {
            RefOr::T(Schema::Array(Array::new(Ref::from_schema_name(shape.name))))
        }
    };

    if !route.enveloped {
        return data;
    }

    object(
        ObjectBuilder::new()
            .schema_type(Type::Object)
            .property("success", object(ObjectBuilder::new().schema_type(Type::Boolean)))
            .required("success")
            .property("data", data)
            .required("data"),
    )
}

fn shape_schema(shape: &Shape) -> RefOr<Schema> {
    let mut builder = ObjectBuilder::new()
        .schema_type(Type::Object)
        .title(Some(shape.name));

    for field in shape.fields {
        builder = builder.property(field.name, field_schema(field));
        if field.required {
            builder = builder.required(field.name);
        }
    }

    if shape.require_any {
        builder = builder
            .min_properties(Some(1))
            .description(Some("At least one field is required"));
    }

    object(builder)
}

fn field_schema(field: &Field) -> RefOr<Schema> {
    match field.rule {
        Rule::Object(shape) => {
            let target = RefOr::Ref(Ref::from_schema_name(shape.name));
            if !field.nullable {
                return target;
            }
            RefOr::T(Schema::OneOf(
                OneOfBuilder::new()
                    .item(target)
                    .item(object(ObjectBuilder::new().schema_type(Type::Null)))
                    .build(),
            ))
        }
        Rule::List(shape) => {
            RefOr::T(Schema::Array(Array::new(Ref::from_schema_name(shape.name))))
        }
        rule => {
            let schema_type = if field.nullable {
                SchemaType::Array(vec![Type::String, Type::Null])
            } else {
                SchemaType::Type(Type::String)
            };

            let mut builder = ObjectBuilder::new()
                .schema_type(schema_type)
                .description(field.description);

            builder = match rule {
                Rule::Text { min, max } => builder
                    .min_length((min > 0).then_some(min))
                    .max_length(max),
                Rule::Email => builder.format(Some(SchemaFormat::Custom("email".to_string()))),
                Rule::Uuid => builder.format(Some(SchemaFormat::KnownFormat(KnownFormat::Uuid))),
                Rule::DateTime => {
                    builder.format(Some(SchemaFormat::KnownFormat(KnownFormat::DateTime)))
                }
                Rule::Object(_) | Rule::List(_) => builder,
            };

            object(builder)
        }
    }
}

fn violation_schema() -> RefOr<Schema> {
    let string = || object(ObjectBuilder::new().schema_type(Type::String));
    object(
        ObjectBuilder::new()
            .schema_type(Type::Object)
            .property("path", string())
            .required("path")
            .property("code", string())
            .required("code")
            .property("message", string())
            .required("message"),
    )
}

fn error_schema() -> RefOr<Schema> {
    object(
        ObjectBuilder::new()
            .schema_type(Type::Object)
            .property("success", object(ObjectBuilder::new().schema_type(Type::Boolean)))
            .required("success")
            .property("error", object(ObjectBuilder::new().schema_type(Type::String)))
            .required("error")
            .property(
                "details",
                RefOr::T(Schema::Array(Array::new(Ref::from_schema_name("Violation")))),
            ),
    )
}

fn tags(routes: &[RouteDoc]) -> Vec<utoipa::openapi::tag::Tag> {
    let mut names: Vec<&str> = Vec::new();
    for route in routes {
        if !names.contains(&route.tag) {
            names.push(route.tag);
        }
    }
    names
        .into_iter()
        .map(|name| TagBuilder::new().name(name).build())
        .collect()
}

fn object(builder: ObjectBuilder) -> RefOr<Schema> {
    RefOr::T(Schema::Object(builder.build()))
}
