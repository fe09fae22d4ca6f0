mod clock_tests;
