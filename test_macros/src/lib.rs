use proc_macro::TokenStream;
use store_adaptor::expand_store_tests;

mod store_adaptor;

/// Expand to the conformance tests of a store adaptor.
///
/// The argument is an expression evaluated inside each async test to build a fresh adaptor. It
/// may `.await` and may `return` early to skip a test when the backend is unavailable.
#[proc_macro]
pub fn test_store_adaptor(factory: TokenStream) -> TokenStream {
    expand_store_tests(factory.into()).into()
}
