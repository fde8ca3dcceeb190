mod schema_catalog_builder_tests;
