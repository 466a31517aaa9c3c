// tests/dead_code_tests.rs
// Dead code after an unconditional `Возврат;`

use bsl_scrubber::parser::{find_methods, Dialect, MethodSpan, SourceDocument};
use bsl_scrubber::process_document;

fn lines(text: &str) -> Vec<String> {
    SourceDocument::parse(text).lines
}

#[cfg(test)]
mod boundary_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_finds_methods_in_order() {
        let text = "Перем А;

Процедура Первая()
    А = 1;
КонецПроцедуры

&НаСервере
Функция Вторая(П)
    Возврат П;
КонецФункции
";
        let spans = find_methods(&lines(text), Dialect::standard());
        assert_eq!(
            spans,
            vec![
                MethodSpan { start: 2, end: 4, terminated: true },
                MethodSpan { start: 7, end: 9, terminated: true },
            ]
        );
    }

    #[test]
    fn test_preprocessor_lines_are_not_boundaries() {
        let text = "#Если Сервер Тогда
Процедура А()
#КонецЕсли
    Б = 1;
КонецПроцедуры";
        let spans = find_methods(&lines(text), Dialect::standard());
        assert_eq!(spans, vec![MethodSpan { start: 1, end: 4, terminated: true }]);
    }

    #[test]
    fn test_keywords_in_strings_and_comments_are_ignored() {
        let text = r#"Т = "Процедура Ложная()";
// Процедура ТожеЛожная()
Процедура Настоящая()
    С = "КонецПроцедуры";
КонецПроцедуры"#;
        let spans = find_methods(&lines(text), Dialect::standard());
        assert_eq!(spans, vec![MethodSpan { start: 2, end: 4, terminated: true }]);
    }

    #[test]
    fn test_unterminated_method_stops_the_scan() {
        let text = "Процедура А()
    Б = 1;
Процедура В()
КонецПроцедуры";
        let spans = find_methods(&lines(text), Dialect::standard());
        // `Процедура В()` is inside the first span, its end closes the first.
        assert_eq!(spans, vec![MethodSpan { start: 0, end: 3, terminated: true }]);

        // The final newline ends `Б = 1;`, it is not a line of its own.
        let text = "Процедура А()\n    Б = 1;\n";
        let spans = find_methods(&lines(text), Dialect::standard());
        assert_eq!(spans, vec![MethodSpan { start: 0, end: 1, terminated: false }]);
    }
}

#[cfg(test)]
mod dead_tail_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_removes_statements_after_return() {
        let input = "Процедура X()
    Возврат;
    А=1;
КонецПроцедуры
";
        let expected = "Процедура X()
    Возврат;
КонецПроцедуры
";
        let (out, changed) = process_document(input);
        assert!(changed);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_return_inside_conditional_is_kept() {
        let input = "Процедура X()
    Если Условие Тогда
        Возврат;
    КонецЕсли;
    Б=2;
КонецПроцедуры
";
        let (out, changed) = process_document(input);
        assert!(!changed);
        assert_eq!(out, input);
    }

    #[test]
    fn test_return_inside_loops_try_and_preprocessor_is_kept() {
        for (open, close) in [
            ("Для Каждого Стр Из Т Цикл", "КонецЦикла;"),
            ("Пока Истина Цикл", "КонецЦикла;"),
            ("Попытка", "КонецПопытки;"),
            ("#Если Сервер Тогда", "#КонецЕсли"),
        ] {
            let input = format!(
                "Функция Ф()\n    {open}\n        Возврат;\n    {close}\n    А = 1;\nКонецФункции\n"
            );
            let (out, changed) = process_document(&input);
            assert!(!changed, "{open}");
            assert_eq!(out, input);
        }
    }

    #[test]
    fn test_return_after_closed_block_is_top_level() {
        let input = "Процедура X()
    Если А Тогда
        Б = 1;
    ИначеЕсли В Тогда
        Б = 2;
    КонецЕсли;
    Возврат;
    Сообщить(Б);

    Г = 3;
КонецПроцедуры";
        let expected = "Процедура X()
    Если А Тогда
        Б = 1;
    ИначеЕсли В Тогда
        Б = 2;
    КонецЕсли;
    Возврат;
КонецПроцедуры";
        assert_eq!(process_document(input), (expected.to_string(), true));
    }

    #[test]
    fn test_no_return_means_no_change() {
        let input = "Функция Ф()\n    А = 1;\n    Возврат А;\n    Б = 2;\nКонецФункции";
        assert_eq!(process_document(input), (input.to_string(), false));
    }

    #[test]
    fn test_only_bare_return_counts() {
        let input = r#"Процедура X()
    Объект.Возврат;
    // Возврат;
    Сообщить("Возврат;");
    |Возврат;
    А = 1;
КонецПроцедуры"#;
        assert_eq!(process_document(input), (input.to_string(), false));
    }

    #[test]
    fn test_blank_tail_is_left_alone() {
        let input = "Процедура X()\n    Возврат;\n\n   \nКонецПроцедуры";
        assert_eq!(process_document(input), (input.to_string(), false));
    }

    #[test]
    fn test_return_with_trailing_comment() {
        let input = "Процедура X()\n    Возврат; // выход\n    А = 1;\nКонецПроцедуры";
        let expected = "Процедура X()\n    Возврат; // выход\nКонецПроцедуры";
        assert_eq!(process_document(input), (expected.to_string(), true));
    }

    #[test]
    fn test_over_closing_clamps_to_zero() {
        // The stray close must not swallow the following `Если`.
        let input = "Процедура X()
    КонецЕсли;
    Если А Тогда
        Возврат;
    КонецЕсли;
    Б = 1;
КонецПроцедуры";
        assert_eq!(process_document(input), (input.to_string(), false));
    }

    #[test]
    fn test_several_methods_are_cleaned_independently() {
        let input = "Процедура А()\r
    Возврат;\r
    А1 = 1;\r
    А2 = 2;\r
КонецПроцедуры\r
\r
Процедура Б()\r
    Если Истина Тогда\r
        Возврат;\r
    КонецЕсли;\r
    Б1 = 1;\r
КонецПроцедуры\r
\r
Функция В()\r
    return;\r
    В1 = 1;\r
EndFunction\r
";
        let expected = "Процедура А()\r
    Возврат;\r
КонецПроцедуры\r
\r
Процедура Б()\r
    Если Истина Тогда\r
        Возврат;\r
    КонецЕсли;\r
    Б1 = 1;\r
КонецПроцедуры\r
\r
Функция В()\r
    return;\r
EndFunction\r
";
        let (out, changed) = process_document(input);
        assert!(changed);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_unterminated_method_keeps_last_line() {
        let input = "Процедура X()\n    Возврат;\n    А = 1;\n    Б = 2;";
        let expected = "Процедура X()\n    Возврат;\n    Б = 2;";
        assert_eq!(process_document(input), (expected.to_string(), true));
    }

    #[test]
    fn test_trailing_newline_does_not_move_unterminated_end() {
        for nl in ["\n", "\r\n"] {
            let input = ["Процедура X()", "    Возврат;", "    А = 1;", "    Б = 2;", ""].join(nl);
            let expected = ["Процедура X()", "    Возврат;", "    Б = 2;", ""].join(nl);
            assert_eq!(process_document(&input), (expected, true));
        }
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let input = "Процедура X()\n    Возврат;\n    А = 1;\nКонецПроцедуры\n";
        let (once, changed) = process_document(input);
        assert!(changed);
        let (twice, changed_again) = process_document(&once);
        assert!(!changed_again);
        assert_eq!(twice, once);
    }
}
