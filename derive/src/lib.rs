use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Field, Index, LitStr, Member};

/// Derive macro for records written by `record_csv::RecordEncoder`.
///
/// Generates a `serde::Serialize` impl that emits the struct's fields in
/// declaration order, keyed by their external column name. The name comes
/// from `#[csv(name = "...")]`; a field without it gets an empty column name.
///
/// # Example
///
/// ```ignore
/// #[derive(Record)]
/// pub struct Trade {
///     #[csv(name = "symbol")]
///     pub symbol: String,
///
///     #[csv(name = "price")]
///     pub price: f64,
///
///     pub internal_id: u64, // column name ""
/// }
/// ```
///
/// Named and tuple structs are supported. The generated impl replaces
/// `#[derive(Serialize)]` on the same type.
#[proc_macro_derive(Record, attributes(csv))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(mut input: DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    let name = input.ident.clone();
    let name_str = name.to_string();

    let fields: Vec<Field> = match &input.data {
        Data::Struct(data) => data.fields.iter().cloned().collect(),
        _ => {
            return Err(syn::Error::new_spanned(
                &name,
                "Record only supports structs",
            ))
        }
    };

    let mut members = Vec::with_capacity(fields.len());
    let mut columns = Vec::with_capacity(fields.len());

    for (index, field) in fields.iter().enumerate() {
        let member = match &field.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(Index::from(index)),
        };
        members.push(member);
        columns.push(column_name(field)?);
    }

    let where_clause = input.generics.make_where_clause();
    for field in &fields {
        let ty = &field.ty;
        where_clause
            .predicates
            .push(parse_quote!(#ty: ::record_csv::__serde::Serialize));
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let len = members.len();

    Ok(quote! {
        impl #impl_generics ::record_csv::__serde::Serialize for #name #ty_generics #where_clause {
            fn serialize<__S>(
                &self,
                __serializer: __S,
            ) -> ::core::result::Result<__S::Ok, __S::Error>
            where
                __S: ::record_csv::__serde::Serializer,
            {
                let mut __state = ::record_csv::__serde::Serializer::serialize_struct(
                    __serializer,
                    #name_str,
                    #len,
                )?;
                #(
                    ::record_csv::__serde::ser::SerializeStruct::serialize_field(
                        &mut __state,
                        #columns,
                        &self.#members,
                    )?;
                )*
                ::record_csv::__serde::ser::SerializeStruct::end(__state)
            }
        }
    })
}

/// Reads `#[csv(name = "...")]`, defaulting to an empty name.
fn column_name(field: &Field) -> Result<String, syn::Error> {
    let mut name = String::new();

    for attr in &field.attrs {
        if !attr.path().is_ident("csv") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                name = value.value();
                Ok(())
            } else {
                Err(meta.error("unknown csv attribute (expected `name = \"...\"`)"))
            }
        })?;
    }

    Ok(name)
}
