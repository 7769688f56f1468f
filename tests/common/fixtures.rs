/// Test data fixtures for consistent testing

/// Weather stations with coordinates, semicolon-delimited with decimal commas
pub fn stations_csv() -> &'static str {
    "Estación;Latitud;Longitud;Temperatura
Sevilla Aeropuerto;37,42;-5,89;21,5
Córdoba;37,84;-4,85;23,1
Málaga;36,67;-4,48;19,8
"
}

/// Monthly unemployment rate
pub fn monthly_rate_csv() -> &'static str {
    "fecha_ref;tasaParo
2023-01;12,5
2023-02;12,1
2023-03;11,9
"
}

/// Records wrapped under a conventional key
pub fn wrapped_json() -> &'static str {
    r#"{
  "count": 3,
  "data": [
    {"fecha": "2023-01-01", "valor": 10},
    {"fecha": "2023-02-01", "valor": 12.5},
    {"fecha": "2023-03-01", "valor": 11}
  ]
}"#
}

/// Two regions over two months, one confidential cell
pub fn regional_cube_px() -> &'static str {
    r#"CHARSET="ANSI";
AXIS-VERSION="2000";
LANGUAGE="es";
TITLE="Paro registrado por comunidad";
STUB="Comunidad";
HEADING="Periodo";
VALUES("Comunidad")="Andalucía","Cataluña";
VALUES("Periodo")="2023-01","2023-02";
DATA=
10.5 11.2
8.1 "..";
"#
}

/// INE series with epoch-millisecond dates, one series missing a month
pub fn ine_table_json() -> &'static str {
    r#"[
  {
    "COD": "EPA815",
    "Nombre": "Total Nacional. Tasa de paro.",
    "Data": [
      {"Fecha": 1672527600000, "Anyo": 2023, "Valor": 13.26},
      {"Fecha": 1680300000000, "Anyo": 2023, "Valor": 11.6}
    ]
  },
  {
    "COD": "EPA816",
    "Nombre": "Madrid. Tasa de paro.",
    "Data": [
      {"Fecha": 1680300000000, "Anyo": 2023, "Valor": 10.8}
    ]
  }
]"#
}
