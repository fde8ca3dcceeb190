mod variable_materializer_tests;
