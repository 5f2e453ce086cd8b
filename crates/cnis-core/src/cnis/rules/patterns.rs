//! Common regex patterns for CNIS extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // CPF patterns (individual taxpayer ID), in priority order
    pub static ref CPF_WITH_NIT: Regex = Regex::new(
        r"NIT[:\s]*[\d.\-]+\s+CPF[:\s]*(\d{3}\.\d{3}\.\d{3}-\d{2})"
    ).unwrap();

    pub static ref CPF_LABELED: Regex = Regex::new(
        r"CPF[:\s]*(\d{3}\.\d{3}\.\d{3}-\d{2})"
    ).unwrap();

    pub static ref CPF_STANDALONE: Regex = Regex::new(
        r"\b(\d{3}\.\d{3}\.\d{3}-\d{2})\b"
    ).unwrap();

    // CNPJ patterns (employer ID). The leading \b keeps CPF and NIT digits out.
    pub static ref CNPJ_FULL: Regex = Regex::new(
        r"\b(\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2})"
    ).unwrap();

    pub static ref CNPJ_WRAPPED: Regex = Regex::new(
        r"\b(\d{2}\.\d{3}\.\d{3})\s*/\s*(\d{4}-\d{2})"
    ).unwrap();

    pub static ref CNPJ_PARTIAL: Regex = Regex::new(
        r"\b(\d{2}\.\d{3}\.\d{3})"
    ).unwrap();

    pub static ref CNPJ_ANY: Regex = Regex::new(
        r"\b\d{2}\.\d{3}\.\d{3}(?:/\d{4}-\d{2})?"
    ).unwrap();

    pub static ref LEADING_CNPJ: Regex = Regex::new(
        r"^\d{2}\.\d{3}\.\d{3}"
    ).unwrap();

    // Section start markers
    pub static ref COLUMN_HEADER: Regex = Regex::new(
        r"^Código Emp\."
    ).unwrap();

    pub static ref REGISTRATION_RECORD: Regex = Regex::new(
        r"^\d+\s+\d{2}\.\d{3}\.\d{3}"
    ).unwrap();

    pub static ref GROUPING_RECORD: Regex = Regex::new(
        r"^\d+\s+AGRUPAMENTO"
    ).unwrap();

    pub static ref INDEXED_UPPERCASE: Regex = Regex::new(
        r"^\d+\s+[A-Z]"
    ).unwrap();

    // Section end markers
    pub static ref SECTION_END: Regex = Regex::new(
        r"^(?:Relações Previdenciárias|Valores Consolidados|Legenda|TOTAIS)"
    ).unwrap();

    // Employer evidence
    pub static ref UPPERCASE_RUN: Regex = Regex::new(
        r"[A-Z]{3,}"
    ).unwrap();

    pub static ref UPPERCASE_WORD: Regex = Regex::new(
        r"[A-Z]{5,}"
    ).unwrap();

    // Employer lines
    pub static ref EMPLOYER_LINE: Regex = Regex::new(
        r"^\d+\s+(\d{2}\.\d{3}\.\d{3}(?:/\d{4}-\d{2})?)\s+(.+)$"
    ).unwrap();

    pub static ref GROUPING_LINE: Regex = Regex::new(
        r"^\d+\s+(AGRUPAMENTO.+)$"
    ).unwrap();

    pub static ref LEADING_INDEX: Regex = Regex::new(
        r"^\d+\s*"
    ).unwrap();

    pub static ref CONTINUATION_STOP: Regex = Regex::new(
        r"(?i)Empregado|Contribuinte|Data|Início|Fim|Remuneração"
    ).unwrap();

    pub static ref EMPLOYEE_TYPE_SUFFIX: Regex = Regex::new(
        r"(?i)\s*(?:Empregado ou Agente|Contribuinte Individual).*$"
    ).unwrap();

    // Date patterns
    pub static ref FULL_DATE: Regex = Regex::new(
        r"(\d{2})/(\d{2})/(\d{4})"
    ).unwrap();

    // Word boundaries keep CNPJ digits (`12.345.601/2010-99`) out.
    pub static ref MONTH_YEAR: Regex = Regex::new(
        r"\b(\d{2})/(\d{4})\b"
    ).unwrap();

    pub static ref MONTH_YEAR_EXACT: Regex = Regex::new(
        r"^(\d{2})/(\d{4})$"
    ).unwrap();

    pub static ref TWO_FULL_DATES: Regex = Regex::new(
        r"(\d{2}/\d{2}/\d{4})\s+(\d{2}/\d{2}/\d{4})"
    ).unwrap();

    pub static ref FULL_DATE_MONTH_YEAR: Regex = Regex::new(
        r"(\d{2}/\d{2}/\d{4})\s+(\d{2}/\d{4})"
    ).unwrap();

    // Birth date
    pub static ref BIRTH_DATE_LABELED: Regex = Regex::new(
        r"Data de nascimento[:\s]*(\d{2}/\d{2}/\d{4})"
    ).unwrap();

    pub static ref BIRTH_DATE_SHORT: Regex = Regex::new(
        r"Nascimento[:\s]*(\d{2}/\d{2}/\d{4})"
    ).unwrap();

    pub static ref BIRTH_DATE_ANY: Regex = Regex::new(
        r"(?i)(?:Data de nascimento|Nascimento)[:\s]*(\d{2}/\d{2}/\d{4})"
    ).unwrap();

    pub static ref BIRTH_MENTION: Regex = Regex::new(
        r"(?i)nascimento|nasc\."
    ).unwrap();

    // Name patterns, in priority order
    pub static ref NAME_WITH_NIT_CPF: Regex = Regex::new(
        r"(?i)NIT[:\s]*[\d.\-]+\s+CPF[:\s]*\d{3}\.\d{3}\.\d{3}-\d{2}\s+Nome[:\s]*([A-ZÁÊÇÕ][A-ZÁÊÇÕa-záêçõ\s]+?)(?:\s+Data|$)"
    ).unwrap();

    pub static ref NAME_WITH_CPF: Regex = Regex::new(
        r"(?i)CPF[:\s]*\d{3}\.\d{3}\.\d{3}-\d{2}\s+Nome[:\s]*([A-ZÁÊÇÕ][A-ZÁÊÇÕa-záêçõ\s]+?)(?:\s+Data|$)"
    ).unwrap();

    pub static ref NAME_LABELED: Regex = Regex::new(
        r"(?i)Nome[:\s]+([A-ZÁÊÇÕ][A-ZÁÊÇÕa-záêçõ\s]+?)(?:\s+Data|$)"
    ).unwrap();

    // Case-sensitive: the first letter must be a capital.
    pub static ref NAME_BARE_LINE: Regex = Regex::new(
        r"^([A-ZÁÊÇÕ][A-ZÁÊÇÕa-záêçõ]+\s+[A-ZÁÊÇÕa-záêçõ\s]+)\s*$"
    ).unwrap();

    pub static ref NAME_NOISE: Regex = Regex::new(
        r"[0-9\-_.()\[\]]"
    ).unwrap();

    pub static ref NAME_RESERVED_PREFIX: Regex = Regex::new(
        r"^(?:DATA|NASCIMENTO|CPF|NIT|EXTRATO)"
    ).unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(
        r"\s+"
    ).unwrap();
}
