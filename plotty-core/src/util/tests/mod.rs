mod present_tests;
