//! Parameter resolution for one request against one method descriptor.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequest, Multipart, Query},
    http::{Request, StatusCode},
    Form, Json,
};
use serde_json::Value;
use thiserror::Error;

use crate::config::UploadOptions;
use crate::handler::{Argument, Arguments};
use crate::params::coerce::coerce;
use crate::params::error::ParamError;
use crate::params::source::{ContentKind, RequestBody, RequestContext};
use crate::params::validate::validate;
use crate::params::value::{ParamKind, ParamValue};
use crate::registry::{MethodDescriptor, ParamBinding, RequestParam};
use crate::upload::{accept_uploads, upload_fields, UploadError};

/// Failure to produce the argument list for a request.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    /// The body could not be parsed for its declared content type.
    #[error("{message}")]
    Body { status: StatusCode, message: String },
}

/// Resolve the handler arguments for `req`.
///
/// Methods without bindings get an empty argument list and the body is left
/// unread. Multipart bodies go through the upload gate before any parameter
/// is looked at.
pub async fn resolve(
    req: Request<Body>,
    descriptor: &MethodDescriptor,
    upload: &UploadOptions,
) -> Result<Arguments, ResolveError> {
    if !descriptor.has_params() {
        return Ok(Arguments::default());
    }

    let ctx = Arc::new(build_context(req, descriptor, upload).await?);
    Ok(resolve_bindings(&ctx, descriptor)?)
}

/// Parse query, body, and uploads into a [`RequestContext`].
pub async fn build_context(
    req: Request<Body>,
    descriptor: &MethodDescriptor,
    upload: &UploadOptions,
) -> Result<RequestContext, ResolveError> {
    let mut ctx = RequestContext {
        method: req.method().clone(),
        uri: req.uri().clone(),
        headers: req.headers().clone(),
        extensions: req.extensions().clone(),
        query: Query::<HashMap<String, String>>::try_from_uri(req.uri())
            .map(|Query(query)| query)
            .unwrap_or_default(),
        ..Default::default()
    };

    match ContentKind::from_headers(&ctx.headers) {
        ContentKind::Multipart => {
            let multipart = Multipart::from_request(req, &()).await.map_err(|rejection| ResolveError::Body {
                status: rejection.status(),
                message: rejection.body_text(),
            })?;
            let fields = upload_fields(descriptor, upload.max_files_per_field);
            let data = accept_uploads(multipart, &fields, upload).await?;
            ctx.body = RequestBody::Multipart(data.fields);
            ctx.files = data.files;
        }
        _ if ctx.reads_query() => {}
        ContentKind::Json => {
            let Json(body) = Json::<Value>::from_request(req, &()).await.map_err(|rejection| ResolveError::Body {
                status: rejection.status(),
                message: rejection.body_text(),
            })?;
            ctx.body = RequestBody::Json(body);
        }
        ContentKind::Form => {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, &())
                .await
                .map_err(|rejection| ResolveError::Body {
                    status: rejection.status(),
                    message: rejection.body_text(),
                })?;
            ctx.body = RequestBody::Form(fields);
        }
        ContentKind::Other => {}
    }

    Ok(ctx)
}

/// Produce one argument per position, in ascending index order.
///
/// Positions without a binding are filled with [`Argument::Absent`] so that
/// argument positions always equal declared indices.
pub fn resolve_bindings(ctx: &Arc<RequestContext>, descriptor: &MethodDescriptor) -> Result<Arguments, ParamError> {
    let mut args = Vec::new();

    for (index, binding) in descriptor.bindings() {
        args.resize_with(index, || Argument::Absent);
        let arg = match binding {
            ParamBinding::Context => Argument::Context(Arc::clone(ctx)),
            ParamBinding::Request(param) => match resolve_param(ctx, param, &descriptor.param_kind(index))? {
                Some(value) => Argument::Value(value),
                None => Argument::Absent,
            },
        };
        args.push(arg);
    }

    Ok(Arguments::new(args))
}

fn resolve_param(ctx: &RequestContext, param: &RequestParam, kind: &ParamKind) -> Result<Option<ParamValue>, ParamError> {
    let options = &param.options;

    let value = if options.file {
        ctx.file_value(&param.name, options.multiple)
    } else {
        match ctx.raw_value(&param.name) {
            Some(raw) => coerce(&param.name, &raw, kind, options)?,
            None => None,
        }
    };

    match value {
        Some(value) => {
            validate(&param.name, &value, &options.constraints)?;
            Ok(Some(value))
        }
        None if !options.required => Ok(None),
        None => match &options.default {
            Some(default) => Ok(Some(default.clone())),
            None => Err(ParamError::RequiredMissing {
                name: param.name.clone(),
            }),
        },
    }
}
