//! # Shadegen - Derive macros
//!
//! Generates the type descriptor and graph node plumbing for shader types.
//!
//! ```ignore
//! #[derive(ShaderNode)]
//! #[shader(method(name = "MainPS", stage = "pixel", source = PS_SOURCE))]
//! struct FlatMaterial {
//!     #[shader(constant_buffer)]
//!     Tint: Float4,
//!     Albedo: Texture2D,
//!     AlbedoSampler: SamplerState,
//! }
//! ```
//!
//! The derive emits an associated `type_descriptor()` function backed by a
//! `OnceLock` and an implementation of `ShaderNode` that resolves members
//! marked `static_resource` to their live sub-graph nodes.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

#[proc_macro_derive(ShaderNode, attributes(shader))]
pub fn derive_shader_node(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_shader_node(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

struct MethodSpec {
    name: String,
    stage: Option<proc_macro2::TokenStream>,
    source: syn::Expr,
}

fn expand_shader_node(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let name_str = name.to_string();

    let mut base: Option<syn::Path> = None;
    let mut methods: Vec<MethodSpec> = Vec::new();

    for attr in &input.attrs {
        if !attr.path().is_ident("shader") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("base") {
                base = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("method") {
                methods.push(parse_method(&meta)?);
                Ok(())
            } else {
                Err(meta.error("unknown shader attribute"))
            }
        })?;
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "ShaderNode requires named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "ShaderNode can only derive for structs",
            ))
        }
    };

    let mut member_tokens = Vec::new();
    let mut node_arms = Vec::new();

    for field in fields {
        let ident = field.ident.as_ref().unwrap();
        let member_name = ident.to_string();
        let type_name = field_type_name(&field.ty)?;

        let mut kind = quote! { None };
        let mut authoritative = true;
        let mut is_node = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("shader") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("weak") {
                    authoritative = false;
                    return Ok(());
                }
                if meta.path.is_ident("semantic") {
                    let value: LitStr = meta.value()?.parse()?;
                    let semantic = semantic_tokens(&value)?;
                    kind = quote! {
                        Some(shadegen_graph::ResourceKind::Semantic(#semantic))
                    };
                    return Ok(());
                }
                let resource = if meta.path.is_ident("constant_buffer") {
                    quote! { ConstantBuffer }
                } else if meta.path.is_ident("texture2d") {
                    quote! { Texture2D }
                } else if meta.path.is_ident("texture_array") {
                    quote! { TextureArray }
                } else if meta.path.is_ident("texture_cube") {
                    quote! { TextureCube }
                } else if meta.path.is_ident("sampler") {
                    quote! { Sampler }
                } else if meta.path.is_ident("static_resource") {
                    is_node = true;
                    quote! { StaticResource }
                } else {
                    return Err(meta.error("unknown shader member attribute"));
                };
                kind = quote! { Some(shadegen_graph::ResourceKind::#resource) };
                Ok(())
            })?;
        }

        member_tokens.push(quote! {
            shadegen_graph::MemberDescriptor {
                name: #member_name,
                type_name: #type_name,
                kind: #kind,
                authoritative: #authoritative,
            }
        });

        if is_node {
            node_arms.push(quote! {
                #member_name => shadegen_graph::MemberValue::Node(
                    shadegen_graph::AsShaderNode::as_shader_node(&self.#ident),
                ),
            });
        }
    }

    let method_tokens = methods.iter().map(|method| {
        let method_name = &method.name;
        let stage = match &method.stage {
            Some(stage) => quote! { Some(#stage) },
            None => quote! { None },
        };
        let source = &method.source;
        quote! {
            shadegen_graph::MethodDescriptor {
                name: #method_name,
                stage: #stage,
                source: #source,
            }
        }
    });

    let base_tokens = match &base {
        Some(path) => quote! { Some(#path::type_descriptor) },
        None => quote! { None },
    };

    Ok(quote! {
        impl #name {
            /// Get the descriptor shared by every instance of this type
            pub fn type_descriptor() -> &'static shadegen_graph::TypeDescriptor {
                static DESC: std::sync::OnceLock<shadegen_graph::TypeDescriptor> =
                    std::sync::OnceLock::new();
                DESC.get_or_init(|| shadegen_graph::TypeDescriptor {
                    name: #name_str,
                    base: #base_tokens,
                    kind: shadegen_graph::TypeKind::Struct,
                    members: vec![#(#member_tokens),*],
                    methods: vec![#(#method_tokens),*],
                })
            }
        }

        impl shadegen_graph::ShaderNode for #name {
            fn descriptor(&self) -> &'static shadegen_graph::TypeDescriptor {
                #name::type_descriptor()
            }

            fn member(&self, name: &str) -> shadegen_graph::MemberValue<'_> {
                match name {
                    #(#node_arms)*
                    _ => shadegen_graph::MemberValue::Data,
                }
            }
        }
    })
}

fn parse_method(meta: &syn::meta::ParseNestedMeta) -> syn::Result<MethodSpec> {
    let mut name = None;
    let mut stage = None;
    let mut source = None;

    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("name") {
            let value: LitStr = inner.value()?.parse()?;
            name = Some(value.value());
            Ok(())
        } else if inner.path.is_ident("stage") {
            let value: LitStr = inner.value()?.parse()?;
            stage = Some(stage_tokens(&value)?);
            Ok(())
        } else if inner.path.is_ident("source") {
            source = Some(inner.value()?.parse()?);
            Ok(())
        } else {
            Err(inner.error("unknown shader method attribute"))
        }
    })?;

    match (name, source) {
        (Some(name), Some(source)) => Ok(MethodSpec {
            name,
            stage,
            source,
        }),
        _ => Err(meta.error("shader method requires name and source")),
    }
}

fn stage_tokens(value: &LitStr) -> syn::Result<proc_macro2::TokenStream> {
    let stage = match value.value().as_str() {
        "vertex" => quote! { shadegen_graph::ShaderStage::Vertex },
        "pixel" => quote! { shadegen_graph::ShaderStage::Pixel },
        "compute" => quote! { shadegen_graph::ShaderStage::Compute },
        other => {
            return Err(syn::Error::new_spanned(
                value,
                format!("unknown shader stage '{}'", other),
            ))
        }
    };
    Ok(stage)
}

fn semantic_tokens(value: &LitStr) -> syn::Result<proc_macro2::TokenStream> {
    let semantic = match value.value().as_str() {
        "position" => quote! { shadegen_graph::Semantic::Position },
        "normal" => quote! { shadegen_graph::Semantic::Normal },
        "texcoord" => quote! { shadegen_graph::Semantic::TexCoord },
        "color" => quote! { shadegen_graph::Semantic::Color },
        "tangent" => quote! { shadegen_graph::Semantic::Tangent },
        "sv_position" => quote! { shadegen_graph::Semantic::SystemPosition },
        "sv_target" => quote! { shadegen_graph::Semantic::SystemTarget },
        "sv_instance_id" => quote! { shadegen_graph::Semantic::SystemInstanceId },
        "sv_render_target_array_index" => {
            quote! { shadegen_graph::Semantic::SystemRenderTargetArrayIndex }
        }
        other => {
            return Err(syn::Error::new_spanned(
                value,
                format!("unknown semantic '{}'", other),
            ))
        }
    };
    Ok(semantic)
}

/// Get the descriptor type name for a field's declared Rust type
fn field_type_name(ty: &syn::Type) -> syn::Result<String> {
    match ty {
        syn::Type::Path(path) => match path.path.segments.last() {
            Some(segment) => Ok(segment.ident.to_string()),
            None => Err(syn::Error::new_spanned(ty, "unsupported member type")),
        },
        _ => Err(syn::Error::new_spanned(
            ty,
            "shader members must have a named type",
        )),
    }
}
